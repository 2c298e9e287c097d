use thiserror::Error;

/// Top-level error type for the Flowarden system.
#[derive(Debug, Error)]
pub enum FlowardenError {
    #[error("store error: {0}")]
    Store(String),

    #[error("rule error: {0}")]
    Rule(String),

    #[error("handler error: {0}")]
    Handler(String),

    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for FlowardenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
