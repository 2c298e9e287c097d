use async_trait::async_trait;
use flowarden_core::{ScopeKey, Workflow};

use crate::entity::ScopedEntity;
use crate::error::StoreError;

/// Tenant-scoped persistence for rules and workflows.
///
/// Every operation takes the owner [`ScopeKey`]; nothing is ever visible
/// across scopes. Implementations must be `Send + Sync` and never expose a
/// partially applied write to `list_for_scope`.
#[async_trait]
pub trait ScopedStore<E: ScopedEntity>: Send + Sync {
    /// All entities in a scope, ordered by creation time ascending (entities
    /// without a creation time first), then by id.
    async fn list_for_scope(&self, scope: ScopeKey) -> Result<Vec<E>, StoreError>;

    /// All entities across every repository of one installation, in the same
    /// order as [`list_for_scope`](Self::list_for_scope) applied per scope,
    /// scopes ordered by repository id.
    async fn list_for_installation(&self, installation_id: u64) -> Result<Vec<E>, StoreError>;

    async fn get(&self, scope: ScopeKey, id: &str) -> Result<Option<E>, StoreError>;

    /// Insert a new entity. Fails with [`StoreError::AlreadyExists`] if the id
    /// is taken. Missing `created_at` is set to now and missing `updated_at`
    /// to `created_at`.
    async fn create(&self, scope: ScopeKey, entity: E) -> Result<E, StoreError>;

    /// Replace an existing entity. Fails with [`StoreError::NotFound`] if absent.
    /// The stored `created_at` is kept and `updated_at` strictly increases.
    async fn update(&self, scope: ScopeKey, entity: E) -> Result<E, StoreError>;

    /// Create or update depending on whether the id exists.
    async fn upsert(&self, scope: ScopeKey, entity: E) -> Result<E, StoreError>;

    /// Remove an entity. Returns `true` if it existed.
    async fn delete(&self, scope: ScopeKey, id: &str) -> Result<bool, StoreError>;

    /// Atomically replace the whole content of a scope. Entities are stored
    /// as given, without stamping.
    async fn replace_scope(&self, scope: ScopeKey, entities: Vec<E>) -> Result<(), StoreError>;

    /// Remove every entity in a scope. Returns `true` if the scope had content.
    async fn clear_scope(&self, scope: ScopeKey) -> Result<bool, StoreError>;
}

/// Store of workflows, keyed by owner scope.
pub type WorkflowStore = dyn ScopedStore<Workflow>;
