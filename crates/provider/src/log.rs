use flowarden_core::{ActionKind, ActionOrigin, EventContext};
use serde_json::{Map, Value};
use tracing::info;

/// Emit the structured record every stand-in handler writes instead of
/// performing an external mutation.
pub fn log_stand_in(
    ctx: &EventContext,
    origin: &ActionOrigin,
    kind: &ActionKind,
    target: &Map<String, Value>,
    verb: &str,
) {
    let action_target = Value::Object(target.clone());
    info!(
        origin = %origin,
        action_type = %kind,
        action_target = %action_target,
        repository = %ctx.repository.full_name,
        delivery_id = ctx.event.delivery_id.as_deref().unwrap_or_default(),
        "stand-in: would {verb}"
    );
}
