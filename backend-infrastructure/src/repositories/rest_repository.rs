// Hosted REST backend client
// Implements both repository ports against the PostgREST-style API that owns
// the materialized rows. Rows come back loosely typed; the domain normalizer
// is the layer that makes sense of them.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use backend_domain::entities::{RawAttendeeRow, RawEventRow};
use backend_domain::ports::{AttendeeRepository, MetadataRepository};
use backend_domain::{FetchError, OwnerId, UpstreamConfig};

pub struct RestRepository {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    events_table: String,
    attendees_table: String,
}

impl RestRepository {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            events_table: config.events_table.clone(),
            attendees_table: config.attendees_table.clone(),
        })
    }

    async fn list_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        owner: &OwnerId,
    ) -> Result<Vec<T>, FetchError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        debug!("fetching {} rows for {}", table, owner);

        let mut request = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("userid", &format!("eq.{}", owner))]);
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key).bearer_auth(api_key);
        }

        let response = request.send().await.map_err(transport_error)?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Auth(format!(
                "upstream rejected credentials for {} ({})",
                table,
                response.status()
            ))),
            status if !status.is_success() => Err(FetchError::Network(format!(
                "upstream returned {} for {}",
                status, table
            ))),
            _ => response
                .json::<Vec<T>>()
                .await
                .map_err(|err| FetchError::Network(format!("invalid response body: {}", err))),
        }
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Network("upstream request timed out".to_string())
    } else {
        FetchError::Network(err.to_string())
    }
}

#[async_trait]
impl MetadataRepository for RestRepository {
    async fn list_events(&self, owner: &OwnerId) -> Result<Vec<RawEventRow>, FetchError> {
        self.list_rows(&self.events_table, owner).await
    }

    async fn ping(&self) -> Result<(), FetchError> {
        let url = format!("{}/rest/v1/", self.base_url);
        let mut request = self.client.head(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key).bearer_auth(api_key);
        }
        let response = request.send().await.map_err(transport_error)?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Auth(
                "upstream rejected credentials".to_string(),
            )),
            status if status.is_server_error() => {
                Err(FetchError::Network(format!("upstream returned {}", status)))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AttendeeRepository for RestRepository {
    async fn list_attendees(&self, owner: &OwnerId) -> Result<Vec<RawAttendeeRow>, FetchError> {
        self.list_rows(&self.attendees_table, owner).await
    }
}
