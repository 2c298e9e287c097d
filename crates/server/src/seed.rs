use std::path::Path;

use flowarden_core::{CreatedBy, FlowardenError, ScopeKey, Workflow};
use flowarden_rules::{Rule, RuleStore};
use flowarden_state::WorkflowStore;
use serde::Deserialize;
use tracing::info;

use crate::error::ServerError;

/// Rules and workflows to install for one tenant scope.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSpec {
    pub owner: ScopeKey,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

/// Totals written by [`apply_seeds`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub scopes: usize,
    pub rules: usize,
    pub workflows: usize,
}

/// Read a seed file. `.json` files are parsed as JSON, anything else as YAML.
pub fn load_seed_file(path: &Path) -> Result<Vec<SeedSpec>, FlowardenError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        FlowardenError::Configuration(format!("failed to read seed file {}: {e}", path.display()))
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        parse_yaml_seeds(&contents)
    }
}

pub fn parse_yaml_seeds(contents: &str) -> Result<Vec<SeedSpec>, FlowardenError> {
    serde_yaml_ng::from_str(contents).map_err(|e| FlowardenError::Serialization(e.to_string()))
}

/// Install seeds. Each scope's rule set is replaced wholesale; workflows are
/// upserted and marked as seeded.
pub async fn apply_seeds(
    rules: &RuleStore,
    workflows: &WorkflowStore,
    specs: Vec<SeedSpec>,
) -> Result<SeedSummary, ServerError> {
    let mut summary = SeedSummary::default();

    for spec in specs {
        summary.scopes += 1;
        summary.rules += spec.rules.len();
        rules.replace_scope(spec.owner, spec.rules).await?;

        for workflow in spec.workflows {
            workflows
                .upsert(spec.owner, workflow.with_created_by(CreatedBy::Seed))
                .await?;
            summary.workflows += 1;
        }
        info!(scope = %spec.owner, "seeded scope");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use flowarden_state::{ScopedStore, StoreError};
    use flowarden_state_memory::MemoryScopedStore;

    use super::*;

    const SEEDS: &str = r#"
- owner: { installationId: 1, repositoryId: 42 }
  rules:
    - id: seed-pr-opened-wip-label
      name: Label WIP PRs on open
      enabled: true
      trigger: { event: pull_request.opened }
      conditions: { type: leaf, path: pullRequest.title, op: contains, value: "[WIP]" }
      actions:
        - type: addLabel
          params: { label: wip }
      evaluationMode: allMatches
      metadata: { version: 1 }
  workflows:
    - id: wf-triage
      name: Triage new issues
      enabled: true
      scope: { installationId: 1, repositoryId: 42 }
      trigger: { event: issue.opened }
      steps:
        - id: s1
          name: Label
          action: { type: addLabel, params: { label: triage } }
- owner: { installationId: 1, repositoryId: 43 }
"#;

    #[test]
    fn parses_yaml_seed_list() {
        let specs = parse_yaml_seeds(SEEDS).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].owner, ScopeKey::new(1, 42));
        assert_eq!(specs[0].rules[0].id.as_str(), "seed-pr-opened-wip-label");
        assert_eq!(specs[0].workflows[0].steps.len(), 1);
        assert!(specs[1].rules.is_empty());
    }

    #[test]
    fn malformed_yaml_is_a_serialization_error() {
        let err = parse_yaml_seeds("- owner: [not, a, scope]").unwrap_err();
        assert!(matches!(err, FlowardenError::Serialization(_)));
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let err = load_seed_file(Path::new("/definitely/not/seeds.yaml")).unwrap_err();
        assert!(matches!(err, FlowardenError::Configuration(_)));
    }

    #[test]
    fn json_files_are_parsed_as_json() {
        let path = std::env::temp_dir().join(format!("flowarden-seed-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"owner": {"installationId": 7, "repositoryId": 8}, "rules": []}]"#,
        )
        .unwrap();
        let specs = load_seed_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(specs[0].owner, ScopeKey::new(7, 8));
    }

    #[tokio::test]
    async fn apply_replaces_rules_and_marks_workflows_as_seeded() {
        let rules = MemoryScopedStore::<Rule>::new();
        let workflows = MemoryScopedStore::<Workflow>::new();
        rules
            .replace_scope(ScopeKey::new(1, 42), vec![Rule::new("stale", "push")])
            .await
            .unwrap();

        let summary = apply_seeds(&rules, &workflows, parse_yaml_seeds(SEEDS).unwrap())
            .await
            .unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                scopes: 2,
                rules: 1,
                workflows: 1
            }
        );

        let listed = rules.list_for_scope(ScopeKey::new(1, 42)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), "seed-pr-opened-wip-label");

        let wf = workflows
            .get(ScopeKey::new(1, 42), "wf-triage")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            wf.metadata.and_then(|m| m.created_by),
            Some(CreatedBy::Seed)
        );
    }

    #[tokio::test]
    async fn reapplying_seeds_is_idempotent() {
        let rules = MemoryScopedStore::<Rule>::new();
        let workflows = MemoryScopedStore::<Workflow>::new();
        for _ in 0..2 {
            apply_seeds(&rules, &workflows, parse_yaml_seeds(SEEDS).unwrap())
                .await
                .unwrap();
        }
        assert_eq!(
            workflows
                .list_for_scope(ScopeKey::new(1, 42))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn workflow_scope_must_match_owner() {
        let yaml = r#"
- owner: { installationId: 1, repositoryId: 42 }
  workflows:
    - id: wf
      name: Wrong owner
      enabled: true
      scope: { installationId: 1, repositoryId: 99 }
      trigger: { event: issue.opened }
      steps: []
"#;
        let rules = MemoryScopedStore::<Rule>::new();
        let workflows = MemoryScopedStore::<Workflow>::new();
        let err = apply_seeds(&rules, &workflows, parse_yaml_seeds(yaml).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServerError::Store(StoreError::ScopeMismatch { .. })
        ));
    }
}
