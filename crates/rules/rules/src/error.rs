use flowarden_state::StoreError;
use thiserror::Error;

/// Errors that can occur while loading rules for evaluation.
///
/// Condition evaluation itself never fails; anomalies inside a condition
/// tree evaluate to `false` instead.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule store could not be read.
    #[error("rule store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = RuleError::from(StoreError::Backend("connection refused".into()));
        assert_eq!(
            err.to_string(),
            "rule store error: backend error: connection refused"
        );
    }
}
