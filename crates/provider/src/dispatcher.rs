use std::sync::Arc;

use flowarden_core::{ActionIntent, ActionResult, EventContext};
use tracing::{debug, instrument};

use crate::error::HandlerError;
use crate::registry::HandlerRegistry;

/// Routes action intents to their registered handlers.
///
/// Dispatch never fails: an unregistered kind, a misrouted intent, bad
/// parameters, or a handler error all become `ok: false` results, and the
/// remaining intents still run.
#[derive(Clone)]
pub struct ActionDispatcher {
    registry: Arc<HandlerRegistry>,
}

impl ActionDispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Execute `intents` one after another. The result at index `i`
    /// belongs to the intent at index `i`.
    #[instrument(skip_all, fields(event = %ctx.event.name, intents = intents.len()))]
    pub async fn dispatch(&self, ctx: &EventContext, intents: &[ActionIntent]) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(intents.len());
        for intent in intents {
            results.push(self.dispatch_one(ctx, intent).await);
        }
        results
    }

    pub async fn dispatch_one(&self, ctx: &EventContext, intent: &ActionIntent) -> ActionResult {
        let Some(handler) = self.registry.get(&intent.kind) else {
            debug!(action_type = %intent.kind, origin = %intent.origin, "no handler registered");
            return ActionResult::failure(
                intent,
                HandlerError::NotImplemented(intent.kind.clone()).to_string(),
            );
        };
        handler.handle(ctx, intent).await
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new(HandlerRegistry::with_defaults())
    }
}
