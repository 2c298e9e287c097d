use async_trait::async_trait;
use flowarden_core::{ActionIntent, ActionKind, ActionOrigin, ActionResult, EventContext};
use serde_json::{Map, Value};

use crate::error::HandlerError;

/// Strongly-typed action handler with native `async fn`.
///
/// A handler owns exactly one [`ActionKind`]. Its parameter bag is turned
/// into [`ActionHandler::Params`] once by [`validate`](Self::validate) before
/// [`execute`](Self::execute) runs, so execution never re-checks the raw map.
///
/// This trait is **not** object-safe. Every `ActionHandler` automatically
/// implements [`DynActionHandler`] via a blanket implementation, which is
/// what the [`HandlerRegistry`](crate::HandlerRegistry) stores.
pub trait ActionHandler: Send + Sync {
    /// Validated, typed parameters for this kind.
    type Params: Send + Sync;

    /// Human-readable handler name, used in misrouting errors.
    fn name(&self) -> &str;

    /// The single action kind this handler accepts.
    fn kind(&self) -> ActionKind;

    /// Turn the raw parameter bag into typed parameters.
    fn validate(&self, params: Option<&Map<String, Value>>) -> Result<Self::Params, HandlerError>;

    /// Carry out the action and return a log-safe target summary.
    fn execute(
        &self,
        ctx: &EventContext,
        origin: &ActionOrigin,
        params: &Self::Params,
    ) -> impl std::future::Future<Output = Result<Map<String, Value>, HandlerError>> + Send;
}

/// Object-safe handler trait for use behind `Arc<dyn DynActionHandler>`.
///
/// `handle` is total: every failure is reported as an `ok: false`
/// [`ActionResult`]. Implement [`ActionHandler`] instead of this trait.
#[async_trait]
pub trait DynActionHandler: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> ActionKind;

    /// Validate and execute one intent.
    async fn handle(&self, ctx: &EventContext, intent: &ActionIntent) -> ActionResult;
}

#[async_trait]
impl<T: ActionHandler + Sync> DynActionHandler for T {
    fn name(&self) -> &str {
        ActionHandler::name(self)
    }

    fn kind(&self) -> ActionKind {
        ActionHandler::kind(self)
    }

    async fn handle(&self, ctx: &EventContext, intent: &ActionIntent) -> ActionResult {
        if intent.kind != ActionHandler::kind(self) {
            let err = HandlerError::UnsupportedKind {
                handler: ActionHandler::name(self).to_owned(),
                kind: intent.kind.clone(),
            };
            return ActionResult::failure(intent, err.to_string());
        }

        let params = match self.validate(intent.params.as_ref()) {
            Ok(params) => params,
            Err(err) => return ActionResult::failure(intent, err.to_string()),
        };

        match ActionHandler::execute(self, ctx, &intent.origin, &params).await {
            Ok(target) => ActionResult::success(intent, target),
            Err(err) => ActionResult::failure(intent, err.to_string()),
        }
    }
}
