use flowarden_core::EventContext;
use serde_json::Value;

/// Top-level context fields a path may address explicitly.
const ROOTS: [&str; 4] = ["event", "repository", "actor", "data"];

/// Resolve a dotted path against the event context.
///
/// Paths beginning with `event.`, `repository.`, `actor.` or `data.` are
/// read from the context root; anything else is read from `data`. Empty
/// segments are skipped. Arrays are not indexable, so any segment applied
/// to a non-object yields `None`.
///
/// `Some(Value::Null)` means the field is present and null, which is
/// different from `None` (absent).
pub fn resolve(ctx: &EventContext, path: &str) -> Option<Value> {
    if path.trim().is_empty() {
        return None;
    }

    let rooted = ROOTS.iter().any(|root| {
        path.strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('.'))
    });

    let mut segments = path.split('.').filter(|s| !s.is_empty());
    if !rooted {
        return resolve_data(ctx, segments);
    }

    match segments.next()? {
        "data" => resolve_data(ctx, segments),
        "event" => walk(&serde_json::to_value(&ctx.event).ok()?, segments).cloned(),
        "repository" => walk(&serde_json::to_value(&ctx.repository).ok()?, segments).cloned(),
        "actor" => {
            let actor = serde_json::to_value(ctx.actor.as_ref()?).ok()?;
            walk(&actor, segments).cloned()
        }
        _ => None,
    }
}

fn resolve_data<'p>(ctx: &EventContext, mut segments: impl Iterator<Item = &'p str>) -> Option<Value> {
    match segments.next() {
        None => Some(Value::Object(ctx.data.clone())),
        Some(first) => walk(ctx.data.get(first)?, segments).cloned(),
    }
}

fn walk<'v, 'p>(mut current: &'v Value, segments: impl Iterator<Item = &'p str>) -> Option<&'v Value> {
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowarden_core::RepositoryInfo;
    use serde_json::json;

    fn ctx() -> EventContext {
        EventContext::new(
            "pull_request.opened",
            123_456,
            RepositoryInfo::new(42, "octo", "repo"),
        )
        .with_delivery_id("deliv_123")
        .with_actor(99, "me")
        .with_data(
            "pullRequest",
            json!({"base": {"ref": "main"}, "labels": ["bug"], "body": null}),
        )
    }

    #[test]
    fn unprefixed_paths_default_to_data() {
        assert_eq!(resolve(&ctx(), "pullRequest.base.ref"), Some(json!("main")));
        assert_eq!(
            resolve(&ctx(), "data.pullRequest.base.ref"),
            Some(json!("main"))
        );
    }

    #[test]
    fn envelope_roots_resolve_from_context() {
        let c = ctx();
        assert_eq!(resolve(&c, "repository.name"), Some(json!("repo")));
        assert_eq!(resolve(&c, "repository.fullName"), Some(json!("octo/repo")));
        assert_eq!(resolve(&c, "event.name"), Some(json!("pull_request.opened")));
        assert_eq!(resolve(&c, "event.deliveryId"), Some(json!("deliv_123")));
        assert_eq!(resolve(&c, "actor.login"), Some(json!("me")));
        assert_eq!(resolve(&c, "actor.id"), Some(json!(99)));
    }

    #[test]
    fn bare_root_name_is_a_data_key() {
        let c = ctx().with_data("repository", json!("from-data"));
        assert_eq!(resolve(&c, "repository"), Some(json!("from-data")));
    }

    #[test]
    fn missing_actor_is_absent() {
        let mut c = ctx();
        c.actor = None;
        assert_eq!(resolve(&c, "actor.login"), None);
    }

    #[test]
    fn empty_and_blank_paths_are_absent() {
        assert_eq!(resolve(&ctx(), ""), None);
        assert_eq!(resolve(&ctx(), "   "), None);
    }

    #[test]
    fn empty_segments_are_skipped() {
        assert_eq!(resolve(&ctx(), "pullRequest..base.ref"), Some(json!("main")));
    }

    #[test]
    fn arrays_are_not_indexable() {
        assert_eq!(resolve(&ctx(), "pullRequest.labels.0"), None);
        assert_eq!(resolve(&ctx(), "pullRequest.labels"), Some(json!(["bug"])));
    }

    #[test]
    fn null_is_present_but_children_are_absent() {
        assert_eq!(resolve(&ctx(), "pullRequest.body"), Some(Value::Null));
        assert_eq!(resolve(&ctx(), "pullRequest.body.length"), None);
    }

    #[test]
    fn data_root_alone_returns_whole_map() {
        let whole = resolve(&ctx(), "data.").unwrap();
        assert!(whole.get("pullRequest").is_some());
    }
}
