use thiserror::Error;

/// Errors that can occur when starting or running the Flowarden server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A gateway-level error.
    #[error("gateway error: {0}")]
    Gateway(#[from] flowarden_gateway::GatewayError),

    /// A store rejected seeded or submitted data.
    #[error("store error: {0}")]
    Store(#[from] flowarden_state::StoreError),

    /// A seed file could not be read or parsed.
    #[error("seed error: {0}")]
    Seed(#[from] flowarden_core::FlowardenError),
}
