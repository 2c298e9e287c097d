use flowarden_core::EventContext;
use tracing::debug;

use crate::engine::operators::apply;
use crate::engine::path::resolve;
use crate::ir::condition::{ConditionGroup, ConditionNode};

/// Evaluate a condition tree against an event context. Pure and total.
pub fn evaluate(node: &ConditionNode, ctx: &EventContext) -> bool {
    match node {
        ConditionNode::Leaf(leaf) => {
            let actual = resolve(ctx, &leaf.path);
            apply(leaf.op, actual.as_ref(), leaf.value.as_ref())
        }
        ConditionNode::Group(group) => evaluate_group(group, ctx),
        ConditionNode::Unrecognized => {
            // Fail open: a node of unknown shape never blocks a rule.
            debug!("unrecognized condition node treated as a match");
            true
        }
    }
}

/// All present constraints must hold. Empty `all` and empty `any` both pass.
fn evaluate_group(group: &ConditionGroup, ctx: &EventContext) -> bool {
    let all_hold = group
        .all
        .as_ref()
        .is_none_or(|all| all.iter().all(|child| evaluate(child, ctx)));
    let any_holds = group
        .any
        .as_ref()
        .is_none_or(|any| any.is_empty() || any.iter().any(|child| evaluate(child, ctx)));
    let not_holds = group.not.as_ref().is_none_or(|not| !evaluate(not, ctx));

    all_hold && any_holds && not_holds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::condition::Operator;
    use flowarden_core::RepositoryInfo;
    use serde_json::json;

    fn ctx() -> EventContext {
        EventContext::new(
            "pull_request.opened",
            1,
            RepositoryInfo::new(42, "octo", "repo"),
        )
        .with_data(
            "pullRequest",
            json!({"base": {"ref": "main"}, "labels": ["bug"], "title": "[WIP] things"}),
        )
    }

    fn base_is(branch: &str) -> ConditionNode {
        ConditionNode::leaf("pullRequest.base.ref", Operator::Equals, json!(branch))
    }

    #[test]
    fn leaf_resolves_and_applies() {
        assert!(evaluate(&base_is("main"), &ctx()));
        assert!(!evaluate(&base_is("develop"), &ctx()));
    }

    #[test]
    fn all_requires_every_child() {
        let node = ConditionNode::all(vec![
            base_is("main"),
            ConditionNode::leaf("pullRequest.labels", Operator::Contains, json!("bug")),
        ]);
        assert!(evaluate(&node, &ctx()));

        let node = ConditionNode::all(vec![base_is("main"), base_is("develop")]);
        assert!(!evaluate(&node, &ctx()));
    }

    #[test]
    fn any_requires_one_child() {
        let node = ConditionNode::any(vec![base_is("develop"), base_is("main")]);
        assert!(evaluate(&node, &ctx()));

        let node = ConditionNode::any(vec![base_is("develop"), base_is("release")]);
        assert!(!evaluate(&node, &ctx()));
    }

    #[test]
    fn empty_all_and_empty_any_are_vacuous_passes() {
        assert!(evaluate(&ConditionNode::all(vec![]), &ctx()));
        assert!(evaluate(&ConditionNode::any(vec![]), &ctx()));
    }

    #[test]
    fn not_negates() {
        assert!(evaluate(&ConditionNode::not(base_is("develop")), &ctx()));
        assert!(!evaluate(&ConditionNode::not(base_is("main")), &ctx()));
    }

    #[test]
    fn group_constraints_combine_with_and() {
        let node = ConditionNode::Group(ConditionGroup {
            all: Some(vec![base_is("main")]),
            any: Some(vec![base_is("develop")]),
            not: None,
        });
        assert!(!evaluate(&node, &ctx()));

        let node = ConditionNode::Group(ConditionGroup {
            all: Some(vec![base_is("main")]),
            any: Some(vec![base_is("main")]),
            not: Some(Box::new(ConditionNode::exists("pullRequest.draft"))),
        });
        assert!(evaluate(&node, &ctx()));
    }

    #[test]
    fn unconstrained_group_matches() {
        assert!(evaluate(&ConditionNode::always(), &ctx()));
    }

    #[test]
    fn unrecognized_node_fails_open() {
        assert!(evaluate(&ConditionNode::Unrecognized, &ctx()));
        let node = ConditionNode::not(ConditionNode::Unrecognized);
        assert!(!evaluate(&node, &ctx()));
    }

    #[test]
    fn deeply_nested_tree() {
        let node = ConditionNode::all(vec![ConditionNode::any(vec![
            ConditionNode::not(ConditionNode::not(base_is("main"))),
            base_is("nope"),
        ])]);
        assert!(evaluate(&node, &ctx()));
    }
}
