use flowarden_core::{ActionKind, ActionOrigin, EventContext};
use serde_json::{Map, Value};

use crate::error::HandlerError;
use crate::handler::ActionHandler;
use crate::log::log_stand_in;
use crate::params::{AddLabelParams, RemoveLabelParams};

/// Stand-in for adding a label to the event's issue or pull request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLabelHandler;

/// Stand-in for removing a label from the event's issue or pull request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveLabelHandler;

fn label_target(label: &str) -> Map<String, Value> {
    let mut target = Map::new();
    target.insert("label".into(), Value::from(label));
    target
}

impl ActionHandler for AddLabelHandler {
    type Params = AddLabelParams;

    fn name(&self) -> &str {
        "addLabelHandler"
    }

    fn kind(&self) -> ActionKind {
        ActionKind::AddLabel
    }

    fn validate(&self, params: Option<&Map<String, Value>>) -> Result<AddLabelParams, HandlerError> {
        AddLabelParams::from_params(params)
    }

    #[allow(clippy::unused_async)]
    async fn execute(
        &self,
        ctx: &EventContext,
        origin: &ActionOrigin,
        params: &AddLabelParams,
    ) -> Result<Map<String, Value>, HandlerError> {
        let target = label_target(&params.label);
        log_stand_in(ctx, origin, &ActionKind::AddLabel, &target, "add label");
        Ok(target)
    }
}

impl ActionHandler for RemoveLabelHandler {
    type Params = RemoveLabelParams;

    fn name(&self) -> &str {
        "removeLabelHandler"
    }

    fn kind(&self) -> ActionKind {
        ActionKind::RemoveLabel
    }

    fn validate(
        &self,
        params: Option<&Map<String, Value>>,
    ) -> Result<RemoveLabelParams, HandlerError> {
        RemoveLabelParams::from_params(params)
    }

    #[allow(clippy::unused_async)]
    async fn execute(
        &self,
        ctx: &EventContext,
        origin: &ActionOrigin,
        params: &RemoveLabelParams,
    ) -> Result<Map<String, Value>, HandlerError> {
        let target = label_target(&params.label);
        log_stand_in(ctx, origin, &ActionKind::RemoveLabel, &target, "remove label");
        Ok(target)
    }
}
