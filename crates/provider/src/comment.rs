use flowarden_core::{ActionKind, ActionOrigin, EventContext};
use serde_json::{Map, Value};

use crate::error::HandlerError;
use crate::handler::ActionHandler;
use crate::log::log_stand_in;
use crate::params::AddCommentParams;

/// Longest comment prefix carried in a result target.
pub const BODY_PREVIEW_CHARS: usize = 120;

/// Stand-in for posting a comment on the event's issue or pull request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddCommentHandler;

/// First [`BODY_PREVIEW_CHARS`] characters of `body`, with `…` appended when
/// anything was cut.
pub fn body_preview(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_owned(),
    }
}

impl ActionHandler for AddCommentHandler {
    type Params = AddCommentParams;

    fn name(&self) -> &str {
        "addCommentHandler"
    }

    fn kind(&self) -> ActionKind {
        ActionKind::AddComment
    }

    fn validate(
        &self,
        params: Option<&Map<String, Value>>,
    ) -> Result<AddCommentParams, HandlerError> {
        AddCommentParams::from_params(params)
    }

    #[allow(clippy::unused_async)]
    async fn execute(
        &self,
        ctx: &EventContext,
        origin: &ActionOrigin,
        params: &AddCommentParams,
    ) -> Result<Map<String, Value>, HandlerError> {
        let mut target = Map::new();
        target.insert("bodyPreview".into(), Value::from(body_preview(&params.body)));
        log_stand_in(ctx, origin, &ActionKind::AddComment, &target, "add comment");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use flowarden_core::{ActionIntent, RepositoryInfo, RuleId};
    use serde_json::json;

    use super::*;
    use crate::handler::DynActionHandler;

    fn intent(params: Value) -> ActionIntent {
        ActionIntent {
            origin: ActionOrigin::Rule(RuleId::new("r1")),
            kind: ActionKind::AddComment,
            params: params.as_object().cloned(),
        }
    }

    fn ctx() -> EventContext {
        EventContext::new("pull_request.opened", 1, RepositoryInfo::new(2, "o", "r"))
    }

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(body_preview("hello"), "hello");
        let exact = "a".repeat(BODY_PREVIEW_CHARS);
        assert_eq!(body_preview(&exact), exact);
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundaries() {
        let long = "é".repeat(BODY_PREVIEW_CHARS + 5);
        let preview = body_preview(&long);
        assert_eq!(preview.chars().count(), BODY_PREVIEW_CHARS + 1);
        assert!(preview.ends_with('…'));
    }

    #[tokio::test]
    async fn target_never_carries_full_body() {
        let body = "x".repeat(500);
        let result = AddCommentHandler.handle(&ctx(), &intent(json!({"body": body}))).await;
        assert!(result.ok);
        let preview = result.target.unwrap()["bodyPreview"]
            .as_str()
            .unwrap()
            .to_owned();
        assert_eq!(preview, format!("{}…", "x".repeat(BODY_PREVIEW_CHARS)));
    }

    #[tokio::test]
    async fn missing_body_names_the_parameter() {
        let result = AddCommentHandler.handle(&ctx(), &intent(json!({}))).await;
        assert!(!result.ok);
        assert_eq!(
            result.error.as_deref(),
            Some("Missing required params.body (string)")
        );
    }
}
