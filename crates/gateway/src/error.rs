use thiserror::Error;

/// Errors that can occur while running the event pipeline.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A store read failed on the workflow path.
    #[error("store error: {0}")]
    Store(#[from] flowarden_state::StoreError),

    /// An error occurred on the rule path.
    #[error("rule error: {0}")]
    Rule(#[from] flowarden_rules::RuleError),

    /// The gateway was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use flowarden_core::ScopeKey;
    use flowarden_state::StoreError;

    use super::*;

    #[test]
    fn store_errors_convert_through_both_paths() {
        let direct: GatewayError = StoreError::Backend("down".into()).into();
        assert!(matches!(direct, GatewayError::Store(_)));

        let via_rules: GatewayError =
            flowarden_rules::RuleError::from(StoreError::NotFound {
                scope: ScopeKey::new(1, 2),
                id: "r".into(),
            })
            .into();
        assert!(matches!(via_rules, GatewayError::Rule(_)));
    }
}
