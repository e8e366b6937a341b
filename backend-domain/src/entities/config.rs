// Runtime configuration entities

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

/// Connection settings for the hosted REST backend that owns the raw rows.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub events_table: String,
    pub attendees_table: String,
    pub timeout_seconds: u64,
}
