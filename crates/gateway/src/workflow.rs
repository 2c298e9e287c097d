use flowarden_core::{
    ActionIntent, ActionKind, ActionOrigin, EventContext, StepId, Workflow, WorkflowId,
};
use flowarden_provider::ActionDispatcher;
use flowarden_state::WorkflowStore;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GatewayError;

/// Outcome of one attempted workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStepExecution {
    pub step_id: StepId,
    pub action_type: ActionKind,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of running one matched workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionResult {
    pub workflow_id: WorkflowId,
    pub workflow_name: String,
    pub matched: bool,
    /// Enabled steps that were dispatched. Disabled steps are not counted.
    pub steps_attempted: usize,
    pub step_results: Vec<WorkflowStepExecution>,
}

impl WorkflowExecutionResult {
    pub fn failed_steps(&self) -> usize {
        self.step_results.iter().filter(|s| !s.ok).count()
    }
}

/// Runs the unconditional, ordered steps of every workflow triggered by an
/// event.
///
/// Workflows have no conditions, priority, or first-match mode: every
/// enabled workflow whose trigger equals the event name runs in full.
#[derive(Clone)]
pub struct WorkflowEngine {
    dispatcher: ActionDispatcher,
}

impl WorkflowEngine {
    pub fn new(dispatcher: ActionDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Enabled workflows triggered by `event`, in the given order.
    pub fn matching<'a>(workflows: &'a [Workflow], event: &str) -> Vec<&'a Workflow> {
        workflows
            .iter()
            .filter(|wf| wf.enabled && wf.trigger.event == event)
            .collect()
    }

    /// Run one workflow's steps sequentially. A failing step never stops
    /// the steps after it.
    pub async fn execute_workflow(
        &self,
        workflow: &Workflow,
        ctx: &EventContext,
    ) -> WorkflowExecutionResult {
        let origin = ActionOrigin::Workflow(workflow.id.clone());
        let mut step_results = Vec::with_capacity(workflow.steps.len());

        for step in workflow.steps.iter().filter(|s| s.is_enabled()) {
            let intent = ActionIntent::from_spec(origin.clone(), &step.action);
            let result = self.dispatcher.dispatch_one(ctx, &intent).await;
            debug!(workflow = %workflow.id, step = %step.id, ok = result.ok, "workflow step dispatched");
            step_results.push(WorkflowStepExecution {
                step_id: step.id.clone(),
                action_type: result.action_type,
                ok: result.ok,
                error: result.error,
            });
        }

        WorkflowExecutionResult {
            workflow_id: workflow.id.clone(),
            workflow_name: workflow.name.clone(),
            matched: true,
            steps_attempted: step_results.len(),
            step_results,
        }
    }

    /// Run every matching workflow concurrently. Results keep the order of
    /// `workflows`.
    pub async fn execute(
        &self,
        workflows: &[Workflow],
        ctx: &EventContext,
    ) -> Vec<WorkflowExecutionResult> {
        let matched = Self::matching(workflows, &ctx.event.name);
        join_all(matched.into_iter().map(|wf| self.execute_workflow(wf, ctx))).await
    }

    /// Load the workflows for the event's scope and run the matching ones.
    #[instrument(skip_all, fields(event = %ctx.event.name, scope = %ctx.scope()))]
    pub async fn execute_for_context(
        &self,
        store: &WorkflowStore,
        ctx: &EventContext,
    ) -> Result<Vec<WorkflowExecutionResult>, GatewayError> {
        let workflows = store.list_for_scope(ctx.scope()).await?;
        Ok(self.execute(&workflows, ctx).await)
    }
}
