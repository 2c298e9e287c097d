use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use flowarden_core::ScopeKey;
use flowarden_state::entity::{
    ScopedEntity, ensure_scope, listing_order, next_updated_at, stamp_created,
};
use flowarden_state::error::StoreError;
use flowarden_state::store::ScopedStore;

/// In-memory [`ScopedStore`] backed by a [`DashMap`] of scopes.
///
/// Each scope is a single map entry, so every write to a scope (including
/// [`replace_scope`](ScopedStore::replace_scope)) happens under one shard
/// lock and readers never see it half applied. Not persisted across restarts.
#[derive(Debug)]
pub struct MemoryScopedStore<E> {
    scopes: DashMap<ScopeKey, HashMap<String, E>>,
}

impl<E> Default for MemoryScopedStore<E> {
    fn default() -> Self {
        Self {
            scopes: DashMap::new(),
        }
    }
}

impl<E: ScopedEntity> MemoryScopedStore<E> {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut items: Vec<E>) -> Vec<E> {
        items.sort_by(listing_order);
        items
    }
}

/// Carry the stored creation time over and bump `updated_at`.
fn restamp<E: ScopedEntity>(previous: &E, entity: &mut E, now: DateTime<Utc>) {
    let created_at = previous.created_at().unwrap_or(now);
    let updated_at = next_updated_at(previous.updated_at().or(previous.created_at()), now);
    entity.set_timestamps(created_at, updated_at);
}

#[async_trait]
impl<E: ScopedEntity> ScopedStore<E> for MemoryScopedStore<E> {
    async fn list_for_scope(&self, scope: ScopeKey) -> Result<Vec<E>, StoreError> {
        let items = self
            .scopes
            .get(&scope)
            .map(|entities| entities.values().cloned().collect())
            .unwrap_or_default();
        Ok(Self::sorted(items))
    }

    async fn list_for_installation(&self, installation_id: u64) -> Result<Vec<E>, StoreError> {
        let mut per_repo: Vec<(u64, Vec<E>)> = self
            .scopes
            .iter()
            .filter(|entry| entry.key().installation_id == installation_id)
            .map(|entry| {
                let items = entry.value().values().cloned().collect();
                (entry.key().repository_id, Self::sorted(items))
            })
            .collect();
        per_repo.sort_by_key(|(repository_id, _)| *repository_id);
        Ok(per_repo.into_iter().flat_map(|(_, items)| items).collect())
    }

    async fn get(&self, scope: ScopeKey, id: &str) -> Result<Option<E>, StoreError> {
        Ok(self
            .scopes
            .get(&scope)
            .and_then(|entities| entities.get(id).cloned()))
    }

    async fn create(&self, scope: ScopeKey, mut entity: E) -> Result<E, StoreError> {
        ensure_scope(scope, &entity)?;
        let mut entities = self.scopes.entry(scope).or_default();
        if entities.contains_key(entity.entity_id()) {
            return Err(StoreError::AlreadyExists {
                scope,
                id: entity.entity_id().to_owned(),
            });
        }
        stamp_created(&mut entity, Utc::now());
        entities.insert(entity.entity_id().to_owned(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, scope: ScopeKey, mut entity: E) -> Result<E, StoreError> {
        ensure_scope(scope, &entity)?;
        let not_found = || StoreError::NotFound {
            scope,
            id: entity.entity_id().to_owned(),
        };
        let mut entities = self.scopes.get_mut(&scope).ok_or_else(not_found)?;
        let previous = entities.get(entity.entity_id()).ok_or_else(not_found)?;
        restamp(previous, &mut entity, Utc::now());

        entities.insert(entity.entity_id().to_owned(), entity.clone());
        Ok(entity)
    }

    async fn upsert(&self, scope: ScopeKey, mut entity: E) -> Result<E, StoreError> {
        ensure_scope(scope, &entity)?;
        let now = Utc::now();
        // Check and write under the same scope entry guard.
        let mut entities = self.scopes.entry(scope).or_default();
        match entities.get(entity.entity_id()) {
            Some(previous) => restamp(previous, &mut entity, now),
            None => stamp_created(&mut entity, now),
        }

        entities.insert(entity.entity_id().to_owned(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, scope: ScopeKey, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .scopes
            .get_mut(&scope)
            .is_some_and(|mut entities| entities.remove(id).is_some()))
    }

    async fn replace_scope(&self, scope: ScopeKey, entities: Vec<E>) -> Result<(), StoreError> {
        let mut replacement = HashMap::with_capacity(entities.len());
        for entity in entities {
            ensure_scope(scope, &entity)?;
            replacement.insert(entity.entity_id().to_owned(), entity);
        }
        self.scopes.insert(scope, replacement);
        Ok(())
    }

    async fn clear_scope(&self, scope: ScopeKey) -> Result<bool, StoreError> {
        Ok(self
            .scopes
            .remove(&scope)
            .is_some_and(|(_, entities)| !entities.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use flowarden_core::{ActionKind, ActionSpec, CreatedBy, Workflow, WorkflowStep};
    use flowarden_state::testing::run_store_conformance_tests;
    use serde_json::json;

    use super::*;

    fn workflow(scope: ScopeKey, id: &str) -> Workflow {
        Workflow::new(id, format!("workflow {id}"), scope, "issue.opened").with_step(
            WorkflowStep::new(
                "s1",
                "label",
                ActionSpec::new(ActionKind::AddLabel).with_param("label", json!("x")),
            ),
        )
    }

    #[tokio::test]
    async fn conformance() {
        let store = MemoryScopedStore::<Workflow>::new();
        run_store_conformance_tests::<Workflow, _>(&store, workflow)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn create_defaults_created_by_to_api() {
        let store = MemoryScopedStore::<Workflow>::new();
        let key = ScopeKey::new(1, 1);
        let created = store.create(key, workflow(key, "w")).await.unwrap();
        assert_eq!(
            created.metadata.and_then(|m| m.created_by),
            Some(CreatedBy::Api)
        );
    }

    #[tokio::test]
    async fn update_keeps_caller_created_by() {
        let store = MemoryScopedStore::<Workflow>::new();
        let key = ScopeKey::new(1, 1);
        store
            .create(key, workflow(key, "w").with_created_by(CreatedBy::Seed))
            .await
            .unwrap();
        let existing = store.get(key, "w").await.unwrap().unwrap();
        let updated = store
            .update(key, existing.with_enabled(false))
            .await
            .unwrap();
        assert!(!updated.enabled);
        assert_eq!(
            updated.metadata.and_then(|m| m.created_by),
            Some(CreatedBy::Seed)
        );
    }

    #[tokio::test]
    async fn replace_scope_rejects_foreign_entities_without_writing() {
        let store = MemoryScopedStore::<Workflow>::new();
        let key = ScopeKey::new(1, 1);
        store.create(key, workflow(key, "keep")).await.unwrap();

        let foreign = ScopeKey::new(1, 2);
        let err = store
            .replace_scope(key, vec![workflow(key, "a"), workflow(foreign, "b")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ScopeMismatch { .. }));

        let ids: Vec<String> = store
            .list_for_scope(key)
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.id.to_string())
            .collect();
        assert_eq!(ids, vec!["keep"]);
    }

    #[tokio::test]
    async fn rapid_updates_strictly_increase_updated_at() {
        let store = MemoryScopedStore::<Workflow>::new();
        let key = ScopeKey::new(3, 3);
        let mut current = store.create(key, workflow(key, "w")).await.unwrap();
        for _ in 0..50 {
            let next = store.update(key, current.clone()).await.unwrap();
            assert!(next.updated_at() > current.updated_at());
            current = next;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_upserts_of_one_id_all_succeed() {
        let store = std::sync::Arc::new(MemoryScopedStore::<Workflow>::new());
        let key = ScopeKey::new(4, 4);

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move { store.upsert(key, workflow(key, "w")).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let listed = store.list_for_scope(key).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].updated_at() > listed[0].created_at());
    }
}
