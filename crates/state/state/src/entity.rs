use chrono::{DateTime, TimeDelta, Utc};
use flowarden_core::{CreatedBy, ScopeKey, Workflow, WorkflowMetadata};

use crate::error::StoreError;

/// Something a [`ScopedStore`](crate::ScopedStore) can hold.
pub trait ScopedEntity: Clone + Send + Sync + 'static {
    /// Identifier, unique within one scope.
    fn entity_id(&self) -> &str;

    /// The scope the entity claims to belong to, if it records one.
    fn owner_scope(&self) -> Option<ScopeKey> {
        None
    }

    fn created_at(&self) -> Option<DateTime<Utc>>;

    fn updated_at(&self) -> Option<DateTime<Utc>>;

    /// Overwrite both lifecycle timestamps.
    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

/// Reject an entity whose recorded scope differs from the key it is stored under.
pub fn ensure_scope<E: ScopedEntity>(scope: ScopeKey, entity: &E) -> Result<(), StoreError> {
    match entity.owner_scope() {
        Some(owner) if owner != scope => Err(StoreError::ScopeMismatch {
            id: entity.entity_id().to_owned(),
            owner,
            requested: scope,
        }),
        _ => Ok(()),
    }
}

/// Fill in missing creation timestamps. `updated_at` defaults to `created_at`.
pub fn stamp_created<E: ScopedEntity>(entity: &mut E, now: DateTime<Utc>) {
    let created_at = entity.created_at().unwrap_or(now);
    let updated_at = entity.updated_at().unwrap_or(created_at);
    entity.set_timestamps(created_at, updated_at);
}

/// Next `updated_at` for an entity last touched at `previous`.
///
/// Strictly greater than `previous` even when the clock has not advanced.
pub fn next_updated_at(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) if now <= prev => prev + TimeDelta::microseconds(1),
        _ => now,
    }
}

/// Listing order: creation time ascending (unstamped first), then id.
pub fn listing_order<E: ScopedEntity>(a: &E, b: &E) -> std::cmp::Ordering {
    a.created_at()
        .cmp(&b.created_at())
        .then_with(|| a.entity_id().cmp(b.entity_id()))
}

impl ScopedEntity for Workflow {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn owner_scope(&self) -> Option<ScopeKey> {
        Some(self.scope)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Workflow::created_at(self)
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        Workflow::updated_at(self)
    }

    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        let meta = self.metadata.get_or_insert_with(WorkflowMetadata::default);
        meta.created_at = Some(created_at);
        meta.updated_at = Some(updated_at);
        meta.created_by.get_or_insert(CreatedBy::Api);
    }
}
