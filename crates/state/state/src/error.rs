use flowarden_core::ScopeKey;
use thiserror::Error;

/// Errors from scoped store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entity already exists in scope {scope}: {id}")]
    AlreadyExists { scope: ScopeKey, id: String },

    #[error("entity not found in scope {scope}: {id}")]
    NotFound { scope: ScopeKey, id: String },

    #[error("scope mismatch for {id}: entity belongs to {owner}, requested {requested}")]
    ScopeMismatch {
        id: String,
        owner: ScopeKey,
        requested: ScopeKey,
    },

    #[error("backend error: {0}")]
    Backend(String),
}
