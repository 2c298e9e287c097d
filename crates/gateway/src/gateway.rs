use std::sync::Arc;

use flowarden_core::{ActionResult, EventContext, RuleId, ScopeKey};
use flowarden_provider::ActionDispatcher;
use flowarden_rules::{RuleEngine, RuleStore};
use flowarden_state::WorkflowStore;
use serde::{Deserialize, Serialize};
use tokio_util::task::TaskTracker;
use tracing::{info, instrument, warn};

use crate::error::GatewayError;
use crate::metrics::GatewayMetrics;
use crate::workflow::{WorkflowEngine, WorkflowExecutionResult};

/// Everything that happened for one event.
///
/// The rule path and the workflow path are reported independently. A path
/// whose store could not be read leaves its results empty and records the
/// failure in `rule_error` or `workflow_error`; the other path's results are
/// still present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReport {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_id: Option<String>,
    pub scope: ScopeKey,
    pub matched_rule_ids: Vec<RuleId>,
    pub action_results: Vec<ActionResult>,
    pub workflow_results: Vec<WorkflowExecutionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_error: Option<String>,
}

impl EventReport {
    /// `true` when either path failed to load from its store.
    pub fn has_errors(&self) -> bool {
        self.rule_error.is_some() || self.workflow_error.is_some()
    }
}

/// The event pipeline.
///
/// For every event the rule path (evaluate, then dispatch the intents) and
/// the workflow path run concurrently against the event's scope. Use
/// [`GatewayBuilder`](crate::GatewayBuilder) to construct one.
pub struct Gateway {
    pub(crate) rules: Arc<RuleStore>,
    pub(crate) workflows: Arc<WorkflowStore>,
    pub(crate) engine: RuleEngine,
    pub(crate) dispatcher: ActionDispatcher,
    pub(crate) workflow_engine: WorkflowEngine,
    pub(crate) metrics: Arc<GatewayMetrics>,
    pub(crate) background: TaskTracker,
}

impl Gateway {
    /// Run both paths for one event and collect the report.
    ///
    /// Never fails as a whole: action and step failures are reported per
    /// result, and a store failure on one path is recorded in the report
    /// next to the other path's results.
    #[instrument(
        name = "gateway.handle_event",
        skip_all,
        fields(
            event = %ctx.event.name,
            delivery_id = ctx.event.delivery_id.as_deref().unwrap_or_default(),
            scope = %ctx.scope(),
        )
    )]
    pub async fn handle_event(&self, ctx: &EventContext) -> EventReport {
        self.metrics.increment_events_received();

        let (rule_path, workflow_path) = tokio::join!(
            self.run_rules(ctx),
            self.workflow_engine.execute_for_context(self.workflows.as_ref(), ctx),
        );

        let (matched_rule_ids, action_results, rule_error) = match rule_path {
            Ok((matched, results)) => (matched, results, None),
            Err(err) => {
                warn!(error = %err, "rule path failed");
                (Vec::new(), Vec::new(), Some(err.to_string()))
            }
        };
        let (workflow_results, workflow_error) = match workflow_path {
            Ok(results) => (results, None),
            Err(err) => {
                warn!(error = %err, "workflow path failed");
                (Vec::new(), Some(err.to_string()))
            }
        };

        for wf in &workflow_results {
            self.metrics.record_workflow(wf.steps_attempted, wf.failed_steps());
        }

        let report = EventReport {
            event: ctx.event.name.clone(),
            delivery_id: ctx.event.delivery_id.clone(),
            scope: ctx.scope(),
            matched_rule_ids,
            action_results,
            workflow_results,
            rule_error,
            workflow_error,
        };

        if report.has_errors() {
            self.metrics.increment_events_failed();
        }
        info!(
            matched_rules = report.matched_rule_ids.len(),
            actions = report.action_results.len(),
            workflows = report.workflow_results.len(),
            failed = report.has_errors(),
            "event processed"
        );

        report
    }

    /// Process an event in the background. Store failures are only logged.
    ///
    /// Call [`shutdown`](Self::shutdown) to wait for submitted events.
    pub fn submit(self: &Arc<Self>, ctx: EventContext) {
        let gateway = Arc::clone(self);
        self.background.spawn(async move {
            let report = gateway.handle_event(&ctx).await;
            if report.has_errors() {
                warn!(
                    event = %ctx.event.name,
                    scope = %ctx.scope(),
                    rule_error = report.rule_error.as_deref(),
                    workflow_error = report.workflow_error.as_deref(),
                    "background event processing failed"
                );
            }
        });
    }

    /// Stop accepting background work and wait for in-flight events.
    pub async fn shutdown(&self) {
        self.background.close();
        self.background.wait().await;
        info!("gateway shutdown complete");
    }

    async fn run_rules(
        &self,
        ctx: &EventContext,
    ) -> Result<(Vec<RuleId>, Vec<ActionResult>), GatewayError> {
        let evaluation = self.engine.evaluate_rules(self.rules.as_ref(), ctx).await?;
        self.metrics.add_rules_matched(evaluation.matched_rule_ids.len());

        let results = self.dispatcher.dispatch(ctx, &evaluation.actions).await;
        let succeeded = results.iter().filter(|r| r.ok).count();
        self.metrics.record_actions(succeeded, results.len() - succeeded);

        Ok((evaluation.matched_rule_ids, results))
    }

    pub fn rule_store(&self) -> &Arc<RuleStore> {
        &self.rules
    }

    pub fn workflow_store(&self) -> &Arc<WorkflowStore> {
        &self.workflows
    }

    pub fn rule_engine(&self) -> RuleEngine {
        self.engine
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn metrics(&self) -> &Arc<GatewayMetrics> {
        &self.metrics
    }
}
