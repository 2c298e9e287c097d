use flowarden_core::ActionKind;
use thiserror::Error;

/// Errors raised while validating or executing an action intent.
///
/// These never escape the dispatcher; they are rendered into the `error`
/// field of an `ok: false` [`ActionResult`](flowarden_core::ActionResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The intent was routed to a handler for a different kind.
    #[error("{handler} received unsupported action type: {kind}")]
    UnsupportedKind { handler: String, kind: ActionKind },

    /// A required parameter is absent, empty, or of the wrong type.
    #[error("Missing required params.{name} ({expected})")]
    MissingParam {
        name: &'static str,
        expected: &'static str,
    },

    /// No handler is registered for the kind.
    #[error("No handler implemented for action type: {0}")]
    NotImplemented(ActionKind),

    /// The handler accepted the intent but could not carry it out.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}
