use chrono::{TimeZone, Utc};
use flowarden_core::ScopeKey;

use crate::entity::ScopedEntity;
use crate::error::StoreError;
use crate::store::ScopedStore;

/// Run the full scoped store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
/// `make` builds an entity with the given id that belongs to the given scope.
///
/// # Errors
///
/// Returns an error if any store operation fails unexpectedly.
pub async fn run_store_conformance_tests<E, F>(
    store: &dyn ScopedStore<E>,
    make: F,
) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    test_get_missing(store).await?;
    test_create_and_get(store, &make).await?;
    test_create_duplicate(store, &make).await?;
    test_update_missing(store, &make).await?;
    test_update_timestamps(store, &make).await?;
    test_upsert(store, &make).await?;
    test_delete(store, &make).await?;
    test_scope_isolation(store, &make).await?;
    test_scope_mismatch(store, &make).await?;
    test_listing_order(store, &make).await?;
    test_replace_scope(store, &make).await?;
    test_clear_scope(store, &make).await?;
    test_list_for_installation(store, &make).await?;
    Ok(())
}

fn scope(repository_id: u64) -> ScopeKey {
    ScopeKey::new(1000, repository_id)
}

fn ids<E: ScopedEntity>(items: &[E]) -> Vec<String> {
    items.iter().map(|e| e.entity_id().to_owned()).collect()
}

async fn test_get_missing<E: ScopedEntity>(store: &dyn ScopedStore<E>) -> Result<(), StoreError> {
    let found = store.get(scope(1), "missing").await?;
    assert!(found.is_none(), "get on missing id should return None");
    Ok(())
}

async fn test_create_and_get<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(2);
    let created = store.create(key, make(key, "a")).await?;
    assert!(created.created_at().is_some(), "create should stamp created_at");
    assert_eq!(
        created.updated_at(),
        created.created_at(),
        "create should default updated_at to created_at"
    );

    let fetched = store.get(key, "a").await?;
    assert_eq!(
        fetched.map(|e| e.entity_id().to_owned()).as_deref(),
        Some("a")
    );
    Ok(())
}

async fn test_create_duplicate<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(3);
    store.create(key, make(key, "dup")).await?;
    let second = store.create(key, make(key, "dup")).await;
    assert!(
        matches!(second, Err(StoreError::AlreadyExists { .. })),
        "second create with the same id should fail"
    );
    Ok(())
}

async fn test_update_missing<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(4);
    let result = store.update(key, make(key, "ghost")).await;
    assert!(
        matches!(result, Err(StoreError::NotFound { .. })),
        "update of a missing id should fail"
    );
    Ok(())
}

async fn test_update_timestamps<E, F>(
    store: &dyn ScopedStore<E>,
    make: &F,
) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(5);
    let created = store.create(key, make(key, "u")).await?;

    // The caller's copy carries no timestamps; the stored ones must win.
    let first = store.update(key, make(key, "u")).await?;
    let second = store.update(key, first.clone()).await?;

    assert_eq!(first.created_at(), created.created_at());
    assert_eq!(second.created_at(), created.created_at());
    assert!(first.updated_at() > created.updated_at());
    assert!(second.updated_at() > first.updated_at());
    Ok(())
}

async fn test_upsert<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(6);
    let inserted = store.upsert(key, make(key, "x")).await?;
    let updated = store.upsert(key, make(key, "x")).await?;
    assert_eq!(updated.created_at(), inserted.created_at());
    assert!(updated.updated_at() > inserted.updated_at());
    assert_eq!(store.list_for_scope(key).await?.len(), 1);
    Ok(())
}

async fn test_delete<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(7);
    store.create(key, make(key, "d")).await?;
    assert!(store.delete(key, "d").await?, "delete should report removal");
    assert!(!store.delete(key, "d").await?, "second delete should be a no-op");
    assert!(store.get(key, "d").await?.is_none());
    Ok(())
}

async fn test_scope_isolation<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let a = scope(8);
    let b = scope(9);
    store.create(a, make(a, "shared")).await?;

    assert!(store.list_for_scope(b).await?.is_empty());
    assert!(store.get(b, "shared").await?.is_none());
    assert!(!store.delete(b, "shared").await?);

    // The same id may exist independently in another scope.
    store.create(b, make(b, "shared")).await?;
    assert_eq!(ids(&store.list_for_scope(a).await?), vec!["shared"]);
    Ok(())
}

async fn test_scope_mismatch<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let owner = scope(10);
    let other = scope(11);
    let entity = make(owner, "m");
    if entity.owner_scope().is_none() {
        return Ok(());
    }
    let result = store.create(other, entity).await;
    assert!(
        matches!(result, Err(StoreError::ScopeMismatch { .. })),
        "storing under a foreign scope should fail"
    );
    assert!(store.list_for_scope(other).await?.is_empty());
    Ok(())
}

async fn test_listing_order<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(12);
    let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    for (id, at) in [("c", early), ("a", late), ("b", early)] {
        let mut entity = make(key, id);
        entity.set_timestamps(at, at);
        store.create(key, entity).await?;
    }

    assert_eq!(ids(&store.list_for_scope(key).await?), vec!["b", "c", "a"]);
    Ok(())
}

async fn test_replace_scope<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(13);
    let neighbour = scope(14);
    store.create(key, make(key, "old")).await?;
    store.create(neighbour, make(neighbour, "keep")).await?;

    store
        .replace_scope(key, vec![make(key, "y"), make(key, "x")])
        .await?;

    assert_eq!(ids(&store.list_for_scope(key).await?), vec!["x", "y"]);
    assert_eq!(ids(&store.list_for_scope(neighbour).await?), vec!["keep"]);
    Ok(())
}

async fn test_clear_scope<E, F>(store: &dyn ScopedStore<E>, make: &F) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let key = scope(15);
    store.create(key, make(key, "gone")).await?;
    assert!(store.clear_scope(key).await?);
    assert!(store.list_for_scope(key).await?.is_empty());
    assert!(!store.clear_scope(key).await?);
    Ok(())
}

async fn test_list_for_installation<E, F>(
    store: &dyn ScopedStore<E>,
    make: &F,
) -> Result<(), StoreError>
where
    E: ScopedEntity,
    F: Fn(ScopeKey, &str) -> E,
{
    let r2 = ScopeKey::new(2000, 2);
    let r1 = ScopeKey::new(2000, 1);
    let foreign = ScopeKey::new(2001, 1);
    store.create(r2, make(r2, "second")).await?;
    store.create(r1, make(r1, "first")).await?;
    store.create(foreign, make(foreign, "foreign")).await?;

    assert_eq!(
        ids(&store.list_for_installation(2000).await?),
        vec!["first", "second"]
    );
    Ok(())
}
