use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::{ActionIntent, ActionKind, ActionOrigin};

/// Outcome of dispatching one action intent.
///
/// `target` is a redacted summary that is safe to log; it never carries a
/// full comment body or other large payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub ok: bool,
    pub action_type: ActionKind,
    #[serde(rename = "ruleId")]
    pub origin: ActionOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    #[must_use]
    pub fn success(intent: &ActionIntent, target: Map<String, Value>) -> Self {
        Self {
            ok: true,
            action_type: intent.kind.clone(),
            origin: intent.origin.clone(),
            target: Some(target),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(intent: &ActionIntent, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            action_type: intent.kind.clone(),
            origin: intent.origin.clone(),
            target: None,
            error: Some(error.into()),
        }
    }
}
