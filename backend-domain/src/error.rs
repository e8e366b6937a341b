use thiserror::Error;

/// Upstream fetch failures. Clone-able so every caller attached to a shared
/// in-flight fetch observes the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No valid credentials upstream. Propagated immediately, never retried here.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Transient transport or upstream failure. Retry policy belongs to the caller.
    #[error("network error: {0}")]
    Network(String),
}

/// A single malformed source row. Logged and skipped; never aborts a batch.
#[derive(Debug, Error)]
#[error("malformed row at index {index}: {reason}")]
pub struct DataShapeError {
    pub index: usize,
    pub reason: String,
}
