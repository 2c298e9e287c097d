use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{RuleId, WorkflowId};

/// Action type tag.
///
/// Known kinds get their own variant; any other tag is carried verbatim in
/// [`ActionKind::Other`] so it survives deserialization and reaches the
/// dispatcher, which reports it as unimplemented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    AddLabel,
    RemoveLabel,
    AddComment,
    RequestReviewers,
    SetAssignees,
    SetProjectStatus,
    AddToProject,
    SetField,
    Other(String),
}

impl ActionKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AddLabel => "addLabel",
            Self::RemoveLabel => "removeLabel",
            Self::AddComment => "addComment",
            Self::RequestReviewers => "requestReviewers",
            Self::SetAssignees => "setAssignees",
            Self::SetProjectStatus => "setProjectStatus",
            Self::AddToProject => "addToProject",
            Self::SetField => "setField",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for ActionKind {
    fn from(tag: &str) -> Self {
        match tag {
            "addLabel" => Self::AddLabel,
            "removeLabel" => Self::RemoveLabel,
            "addComment" => Self::AddComment,
            "requestReviewers" => Self::RequestReviewers,
            "setAssignees" => Self::SetAssignees,
            "setProjectStatus" => Self::SetProjectStatus,
            "addToProject" => Self::AddToProject,
            "setField" => Self::SetField,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for ActionKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action as declared on a rule or a workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl ActionSpec {
    #[must_use]
    pub fn new(kind: impl Into<ActionKind>) -> Self {
        Self {
            kind: kind.into(),
            params: None,
        }
    }

    /// Set a single parameter, creating the parameter bag if needed.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }
}

/// Where an action intent came from.
///
/// Serialized as the `ruleId` string: the rule id itself, or
/// `workflow:<id>` for workflow steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionOrigin {
    Rule(RuleId),
    Workflow(WorkflowId),
}

const WORKFLOW_ORIGIN_PREFIX: &str = "workflow:";

impl From<String> for ActionOrigin {
    fn from(raw: String) -> Self {
        match raw.strip_prefix(WORKFLOW_ORIGIN_PREFIX) {
            Some(id) => Self::Workflow(WorkflowId::new(id)),
            None => Self::Rule(RuleId::new(raw)),
        }
    }
}

impl From<ActionOrigin> for String {
    fn from(origin: ActionOrigin) -> Self {
        origin.to_string()
    }
}

impl fmt::Display for ActionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule(id) => f.write_str(id),
            Self::Workflow(id) => write!(f, "{WORKFLOW_ORIGIN_PREFIX}{id}"),
        }
    }
}

/// A resolved action about to be dispatched. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionIntent {
    #[serde(rename = "ruleId")]
    pub origin: ActionOrigin,
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl ActionIntent {
    /// Tag a declared action with its origin.
    #[must_use]
    pub fn from_spec(origin: ActionOrigin, spec: &ActionSpec) -> Self {
        Self {
            origin,
            kind: spec.kind.clone(),
            params: spec.params.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_kinds_round_trip_through_tags() {
        for tag in [
            "addLabel",
            "removeLabel",
            "addComment",
            "requestReviewers",
            "setAssignees",
            "setProjectStatus",
            "addToProject",
            "setField",
        ] {
            let kind = ActionKind::from(tag);
            assert!(!matches!(kind, ActionKind::Other(_)), "{tag}");
            assert_eq!(kind.as_str(), tag);
        }
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let spec: ActionSpec = serde_json::from_value(json!({"type": "doesNotExist"})).unwrap();
        assert_eq!(spec.kind, ActionKind::Other("doesNotExist".into()));
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"type": "doesNotExist"})
        );
    }

    #[test]
    fn workflow_origin_uses_pseudo_rule_id() {
        let origin = ActionOrigin::Workflow(WorkflowId::new("wf-1"));
        assert_eq!(origin.to_string(), "workflow:wf-1");

        let intent = ActionIntent::from_spec(
            origin,
            &ActionSpec::new(ActionKind::AddLabel).with_param("label", json!("bug")),
        );
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(
            json,
            json!({"ruleId": "workflow:wf-1", "type": "addLabel", "params": {"label": "bug"}})
        );

        let back: ActionIntent = serde_json::from_value(json).unwrap();
        assert_eq!(back.origin, ActionOrigin::Workflow(WorkflowId::new("wf-1")));
    }

    #[test]
    fn plain_origin_is_a_rule() {
        let origin = ActionOrigin::from("r1".to_owned());
        assert_eq!(origin, ActionOrigin::Rule(RuleId::new("r1")));
    }
}
