use std::sync::Arc;

use flowarden_provider::{ActionDispatcher, DynActionHandler, HandlerRegistry};
use flowarden_rules::{EvaluationMode, RuleEngine, RuleStore};
use flowarden_state::WorkflowStore;
use tokio_util::task::TaskTracker;

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::metrics::GatewayMetrics;
use crate::workflow::WorkflowEngine;

/// Fluent builder for constructing a [`Gateway`] instance.
///
/// A rule store and a workflow store must be supplied. Handlers default to
/// the built-in stand-ins and the evaluation mode to `allMatches`.
pub struct GatewayBuilder {
    rules: Option<Arc<RuleStore>>,
    workflows: Option<Arc<WorkflowStore>>,
    default_mode: EvaluationMode,
    handlers: HandlerRegistry,
    metrics: Option<Arc<GatewayMetrics>>,
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self {
            rules: None,
            workflows: None,
            default_mode: EvaluationMode::default(),
            handlers: HandlerRegistry::with_defaults(),
            metrics: None,
        }
    }

    #[must_use]
    pub fn rule_store(mut self, store: Arc<RuleStore>) -> Self {
        self.rules = Some(store);
        self
    }

    #[must_use]
    pub fn workflow_store(mut self, store: Arc<WorkflowStore>) -> Self {
        self.workflows = Some(store);
        self
    }

    /// Mode applied to rules that do not set one.
    #[must_use]
    pub fn default_mode(mut self, mode: EvaluationMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Register an additional handler, replacing any handler of the same kind.
    #[must_use]
    pub fn handler(mut self, handler: Arc<dyn DynActionHandler>) -> Self {
        self.handlers.register(handler);
        self
    }

    /// Replace the whole handler registry.
    #[must_use]
    pub fn handlers(mut self, registry: HandlerRegistry) -> Self {
        self.handlers = registry;
        self
    }

    /// Share an existing metrics instance instead of creating a new one.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<GatewayMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<Gateway, GatewayError> {
        let rules = self
            .rules
            .ok_or_else(|| GatewayError::Configuration("rule store is required".into()))?;

        let workflows = self
            .workflows
            .ok_or_else(|| GatewayError::Configuration("workflow store is required".into()))?;

        let dispatcher = ActionDispatcher::new(self.handlers);

        Ok(Gateway {
            rules,
            workflows,
            engine: RuleEngine::new(self.default_mode),
            workflow_engine: WorkflowEngine::new(dispatcher.clone()),
            dispatcher,
            metrics: self.metrics.unwrap_or_default(),
            background: TaskTracker::new(),
        })
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
