use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every variant is fatal to the current run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status or an unexpected content type.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// The provider envelope reported failure at the outer or inner level.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("unexpected data shape: {0}")]
    DataShape(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
