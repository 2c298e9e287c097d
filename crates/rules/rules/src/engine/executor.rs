use flowarden_core::{ActionIntent, ActionOrigin, EventContext, RuleId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::engine::eval::evaluate;
use crate::error::RuleError;
use crate::ir::rule::{EvaluationMode, Rule};
use crate::store::RuleStore;

/// Matched rules and the action intents they produced, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEvaluation {
    pub matched_rule_ids: Vec<RuleId>,
    pub actions: Vec<ActionIntent>,
}

/// The rule engine evaluates a tenant's rule set against one event.
///
/// Rules are considered in a fixed order: priority descending (absent
/// priority counts as 0), then id ascending. A matching rule in
/// [`EvaluationMode::FirstMatch`] ends the walk. Rules without an explicit
/// mode use the engine's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine {
    default_mode: EvaluationMode,
}

impl RuleEngine {
    /// Create an engine whose rules default to `default_mode`.
    pub fn new(default_mode: EvaluationMode) -> Self {
        Self { default_mode }
    }

    pub fn default_mode(&self) -> EvaluationMode {
        self.default_mode
    }

    /// Enabled rules triggered by `event`, in evaluation order.
    pub fn order_rules<'a>(rules: &'a [Rule], event: &str) -> Vec<&'a Rule> {
        let mut eligible: Vec<&Rule> = rules
            .iter()
            .filter(|rule| rule.enabled && rule.trigger.event == event)
            .collect();
        eligible.sort_by(|a, b| {
            b.effective_priority()
                .cmp(&a.effective_priority())
                .then_with(|| a.id.cmp(&b.id))
        });
        eligible
    }

    /// Evaluate an already loaded rule set. Performs no I/O.
    #[instrument(skip_all, fields(event = %ctx.event.name, rules_count = rules.len()))]
    pub fn evaluate(&self, rules: &[Rule], ctx: &EventContext) -> RuleEvaluation {
        let mut result = RuleEvaluation::default();

        for rule in Self::order_rules(rules, &ctx.event.name) {
            if !evaluate(&rule.conditions, ctx) {
                debug!(rule = %rule.id, "conditions not met");
                continue;
            }

            debug!(rule = %rule.id, actions = rule.actions.len(), "rule matched");
            result.matched_rule_ids.push(rule.id.clone());
            let origin = ActionOrigin::Rule(rule.id.clone());
            result.actions.extend(
                rule.actions
                    .iter()
                    .map(|spec| ActionIntent::from_spec(origin.clone(), spec)),
            );

            if rule.evaluation_mode.unwrap_or(self.default_mode) == EvaluationMode::FirstMatch {
                debug!(rule = %rule.id, "firstMatch rule stops evaluation");
                break;
            }
        }

        result
    }

    /// Load the rules for the event's scope and evaluate them.
    #[instrument(skip_all, fields(event = %ctx.event.name, scope = %ctx.scope()))]
    pub async fn evaluate_rules(
        &self,
        store: &RuleStore,
        ctx: &EventContext,
    ) -> Result<RuleEvaluation, RuleError> {
        let rules = store.list_for_scope(ctx.scope()).await?;
        Ok(self.evaluate(&rules, ctx))
    }
}
