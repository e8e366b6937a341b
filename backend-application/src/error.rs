use backend_domain::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Upstream(#[from] FetchError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
