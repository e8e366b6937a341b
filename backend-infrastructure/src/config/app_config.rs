use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{RuntimeConfig, UpstreamConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub upstream_base_url: String,
    pub upstream_api_key: Option<String>,
    pub events_table: String,
    pub attendees_table: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub upstream_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            upstream_base_url: "http://127.0.0.1:54321".to_string(),
            upstream_api_key: None,
            events_table: "allMeta".to_string(),
            attendees_table: "attendeeProfile".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            upstream_timeout_seconds: 10,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("TURNOUT_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(bind_addr) = env::var("TURNOUT_BIND_ADDR") {
            self.bind_addr = bind_addr;
        }
        if let Ok(api_token) = env::var("TURNOUT_API_TOKEN") {
            self.api_token = Some(api_token);
        }
        if let Ok(base_url) = env::var("TURNOUT_UPSTREAM_URL") {
            self.upstream_base_url = base_url;
        }
        if let Ok(api_key) = env::var("TURNOUT_UPSTREAM_API_KEY") {
            self.upstream_api_key = Some(api_key);
        }
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        if let Some(api_key) = &self.upstream_api_key {
            if api_key.trim().is_empty() {
                self.upstream_api_key = None;
            }
        }
        while self.upstream_base_url.ends_with('/') {
            self.upstream_base_url.pop();
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.upstream_base_url.trim().is_empty() {
            return Err(anyhow!("upstream_base_url must not be empty"));
        }
        if self.events_table.trim().is_empty() || self.attendees_table.trim().is_empty() {
            return Err(anyhow!("events_table and attendees_table must not be empty"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.upstream_timeout_seconds == 0 {
            return Err(anyhow!("upstream_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            base_url: self.upstream_base_url.clone(),
            api_key: self.upstream_api_key.clone(),
            events_table: self.events_table.clone(),
            attendees_table: self.attendees_table.clone(),
            timeout_seconds: self.upstream_timeout_seconds,
        }
    }
}
