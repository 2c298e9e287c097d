use chrono::{DateTime, Utc};
use flowarden_core::{ActionSpec, RuleId};
use serde::{Deserialize, Serialize};

use super::condition::ConditionNode;

/// Whether evaluation continues after a rule matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EvaluationMode {
    /// Stop at this rule once it matches.
    FirstMatch,
    /// Keep evaluating lower-ordered rules.
    #[default]
    AllMatches,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTrigger {
    /// Normalized event name the rule listens to.
    pub event: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

/// A prioritized condition-to-actions mapping.
///
/// Rules are replaced wholesale; there is no partial patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    pub trigger: RuleTrigger,
    /// Root of the condition tree. Absent means always match.
    #[serde(default)]
    pub conditions: ConditionNode,
    /// Emitted in declared order when the rule matches.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    /// Overrides the engine default when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_mode: Option<EvaluationMode>,
    /// Higher runs first. Absent counts as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RuleMetadata>,
}

impl Rule {
    /// Create an enabled rule with an unconstrained condition and no actions.
    pub fn new(id: impl Into<RuleId>, trigger_event: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            description: None,
            enabled: true,
            trigger: RuleTrigger {
                event: trigger_event.into(),
            },
            conditions: ConditionNode::always(),
            actions: Vec::new(),
            evaluation_mode: None,
            priority: None,
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_conditions(mut self, conditions: ConditionNode) -> Self {
        self.conditions = conditions;
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Effective priority; absent counts as 0.
    pub fn effective_priority(&self) -> i64 {
        self.priority.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowarden_core::ActionKind;
    use serde_json::json;

    #[test]
    fn parses_authoring_shape() {
        let rule: Rule = serde_json::from_value(json!({
            "id": "seed-pr-opened-wip-label",
            "name": "Label WIP PRs on open",
            "enabled": true,
            "trigger": {"event": "pull_request.opened"},
            "conditions": {"type": "leaf", "path": "pullRequest.title", "op": "contains", "value": "[WIP]"},
            "actions": [{"type": "addLabel", "params": {"label": "wip"}}],
            "evaluationMode": "firstMatch",
            "priority": 5,
            "metadata": {"version": 1}
        }))
        .unwrap();

        assert_eq!(rule.id.as_str(), "seed-pr-opened-wip-label");
        assert_eq!(rule.evaluation_mode, Some(EvaluationMode::FirstMatch));
        assert_eq!(rule.effective_priority(), 5);
        assert_eq!(rule.actions[0].kind, ActionKind::AddLabel);
        assert_eq!(rule.metadata.and_then(|m| m.version), Some(1));
    }

    #[test]
    fn missing_conditions_always_match() {
        let rule: Rule = serde_json::from_value(json!({
            "id": "r",
            "name": "r",
            "enabled": true,
            "trigger": {"event": "push"}
        }))
        .unwrap();
        assert_eq!(rule.conditions, ConditionNode::always());
        assert!(rule.actions.is_empty());
        assert_eq!(rule.effective_priority(), 0);
    }

    #[test]
    fn untagged_or_malformed_conditions_do_not_reject_the_rule() {
        let rule: Rule = serde_json::from_value(json!({
            "id": "r",
            "name": "r",
            "enabled": true,
            "trigger": {"event": "push"},
            "conditions": {"any": []}
        }))
        .unwrap();
        assert_eq!(rule.conditions, ConditionNode::any(vec![]));

        let rule: Rule = serde_json::from_value(json!({
            "id": "r",
            "name": "r",
            "enabled": true,
            "trigger": {"event": "push"},
            "conditions": {"type": "leaf", "op": "exists"}
        }))
        .unwrap();
        assert_eq!(rule.conditions, ConditionNode::Unrecognized);
    }
}
