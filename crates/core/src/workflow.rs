use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, ActionSpec};
use crate::scope::ScopeKey;
use crate::types::{StepId, WorkflowId};

/// Maximum length, in characters, of workflow and step names.
pub const MAX_NAME_LEN: usize = 80;

/// Maximum number of steps in a single workflow.
pub const MAX_STEPS: usize = 25;

/// Events a workflow may be triggered by.
pub const SUPPORTED_WORKFLOW_EVENTS: &[&str] = &[
    "issue.opened",
    "issue.assigned",
    "issue.closed",
    "issue.reopened",
    "pull_request.opened",
    "pull_request.draft",
    "pull_request.ready",
    "pull_request.closed",
    "pull_request.merged",
    "pull_request_review.changes_requested",
];

/// Action kinds a workflow step may use.
pub const SUPPORTED_WORKFLOW_ACTIONS: &[ActionKind] = &[
    ActionKind::SetProjectStatus,
    ActionKind::AddLabel,
    ActionKind::AddComment,
    ActionKind::RemoveLabel,
];

/// Linear, unconditional automation: when the trigger matches, every
/// enabled step runs in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub enabled: bool,
    pub scope: ScopeKey,
    pub trigger: WorkflowTrigger,
    pub steps: Vec<WorkflowStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<WorkflowMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowTrigger {
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: StepId,
    pub name: String,
    /// `Some(false)` skips the step; absent means enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub action: ActionSpec,
}

impl WorkflowStep {
    #[must_use]
    pub fn new(id: impl Into<StepId>, name: impl Into<String>, action: ActionSpec) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: None,
            action,
        }
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = Some(false);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    Seed,
    Ui,
    Api,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<CreatedBy>,
}

impl Workflow {
    #[must_use]
    pub fn new(
        id: impl Into<WorkflowId>,
        name: impl Into<String>,
        scope: ScopeKey,
        trigger_event: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            enabled: true,
            scope,
            trigger: WorkflowTrigger {
                event: trigger_event.into(),
            },
            steps: Vec::new(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_created_by(mut self, created_by: CreatedBy) -> Self {
        self.metadata.get_or_insert_with(Default::default).created_by = Some(created_by);
        self
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.metadata.as_ref().and_then(|m| m.created_at)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.metadata.as_ref().and_then(|m| m.updated_at)
    }
}

/// Mutable subset of a workflow. Structural fields (scope, trigger, steps)
/// cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl WorkflowPatch {
    /// Apply the patch in place. Names are trimmed and must stay non-empty.
    pub fn apply(&self, workflow: &mut Workflow) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::new("name", "name must be a non-empty string"));
            }
            if name.chars().count() > MAX_NAME_LEN {
                return Err(ValidationError::new(
                    "name",
                    format!("name must be <= {MAX_NAME_LEN} chars"),
                ));
            }
            name.clone_into(&mut workflow.name);
        }
        if let Some(description) = &self.description {
            workflow.description = Some(description.clone());
        }
        if let Some(enabled) = self.enabled {
            workflow.enabled = enabled;
        }
        Ok(())
    }
}

/// A single validation failure, addressed by field path such as
/// `steps[0].action.type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Check a workflow against the authoring constraints. Returns every
/// violation found; an empty list means the workflow is valid.
pub fn validate_workflow(workflow: &Workflow) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if is_blank(&workflow.id) {
        errors.push(ValidationError::new("id", "id is required"));
    }

    if is_blank(&workflow.name) {
        errors.push(ValidationError::new("name", "name is required"));
    }
    if workflow.name.chars().count() > MAX_NAME_LEN {
        errors.push(ValidationError::new(
            "name",
            format!("name must be <= {MAX_NAME_LEN} chars"),
        ));
    }

    let event = workflow.trigger.event.as_str();
    if is_blank(event) {
        errors.push(ValidationError::new(
            "trigger.event",
            "trigger.event is required",
        ));
    } else if !SUPPORTED_WORKFLOW_EVENTS.contains(&event) {
        errors.push(ValidationError::new(
            "trigger.event",
            format!("Unsupported workflow event: {event}"),
        ));
    }

    if workflow.steps.is_empty() {
        errors.push(ValidationError::new(
            "steps",
            "steps must contain at least 1 step",
        ));
        return errors;
    }
    if workflow.steps.len() > MAX_STEPS {
        errors.push(ValidationError::new(
            "steps",
            format!("steps must be <= {MAX_STEPS} steps"),
        ));
    }

    for (i, step) in workflow.steps.iter().enumerate() {
        let base = format!("steps[{i}]");

        if is_blank(&step.id) {
            errors.push(ValidationError::new(format!("{base}.id"), "id is required"));
        }
        if is_blank(&step.name) {
            errors.push(ValidationError::new(
                format!("{base}.name"),
                "name is required",
            ));
        }
        if step.name.chars().count() > MAX_NAME_LEN {
            errors.push(ValidationError::new(
                format!("{base}.name"),
                format!("name must be <= {MAX_NAME_LEN} chars"),
            ));
        }

        let kind = &step.action.kind;
        if is_blank(kind.as_str()) {
            errors.push(ValidationError::new(
                format!("{base}.action.type"),
                "action.type is required",
            ));
        } else if !SUPPORTED_WORKFLOW_ACTIONS.contains(kind) {
            errors.push(ValidationError::new(
                format!("{base}.action.type"),
                format!("Unsupported action type: {kind}"),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Workflow {
        Workflow::new("wf-1", "Label new PRs", ScopeKey::new(1, 2), "pull_request.opened")
            .with_step(WorkflowStep::new(
                "s1",
                "Add label",
                ActionSpec::new(ActionKind::AddLabel).with_param("label", json!("triage")),
            ))
    }

    fn paths(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn valid_workflow_has_no_errors() {
        assert!(validate_workflow(&valid()).is_empty());
    }

    #[test]
    fn push_is_not_a_workflow_trigger() {
        let mut wf = valid();
        wf.trigger.event = "push".into();
        let errors = validate_workflow(&wf);
        assert_eq!(paths(&errors), vec!["trigger.event"]);
        assert_eq!(errors[0].message, "Unsupported workflow event: push");
    }

    #[test]
    fn empty_steps_stop_validation() {
        let mut wf = valid();
        wf.steps.clear();
        assert_eq!(paths(&validate_workflow(&wf)), vec!["steps"]);
    }

    #[test]
    fn too_many_steps() {
        let mut wf = valid();
        let step = wf.steps[0].clone();
        wf.steps = vec![step; MAX_STEPS + 1];
        assert_eq!(paths(&validate_workflow(&wf)), vec!["steps"]);
    }

    #[test]
    fn step_errors_are_indexed() {
        let wf = valid().with_step(WorkflowStep::new(
            "",
            "x".repeat(MAX_NAME_LEN + 1),
            ActionSpec::new("requestReviewers"),
        ));
        let errors = validate_workflow(&wf);
        assert_eq!(
            paths(&errors),
            vec!["steps[1].id", "steps[1].name", "steps[1].action.type"]
        );
        assert_eq!(errors[2].message, "Unsupported action type: requestReviewers");
    }

    #[test]
    fn name_length_counts_characters() {
        let mut wf = valid();
        wf.name = "é".repeat(MAX_NAME_LEN);
        assert!(validate_workflow(&wf).is_empty());
    }

    #[test]
    fn patch_trims_and_keeps_structure() {
        let mut wf = valid();
        let patch = WorkflowPatch {
            name: Some("  Renamed  ".into()),
            description: Some("docs".into()),
            enabled: Some(false),
        };
        patch.apply(&mut wf).unwrap();
        assert_eq!(wf.name, "Renamed");
        assert_eq!(wf.description.as_deref(), Some("docs"));
        assert!(!wf.enabled);
        assert_eq!(wf.steps.len(), 1);
    }

    #[test]
    fn patch_rejects_blank_name() {
        let mut wf = valid();
        let patch = WorkflowPatch {
            name: Some("   ".into()),
            ..WorkflowPatch::default()
        };
        assert_eq!(patch.apply(&mut wf).unwrap_err().path, "name");
        assert_eq!(wf.name, "Label new PRs");
    }

    #[test]
    fn patch_rejects_structural_fields() {
        let res: Result<WorkflowPatch, _> =
            serde_json::from_value(json!({"trigger": {"event": "push"}}));
        assert!(res.is_err());
    }

    #[test]
    fn disabled_step_round_trips() {
        let step = WorkflowStep::new("s", "n", ActionSpec::new(ActionKind::AddLabel)).disabled();
        assert!(!step.is_enabled());
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["enabled"], false);
    }
}
