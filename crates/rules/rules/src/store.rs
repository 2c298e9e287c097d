use chrono::{DateTime, Utc};
use flowarden_state::{ScopedEntity, ScopedStore};

use crate::ir::rule::{Rule, RuleMetadata};

/// Store of rules, keyed by owner scope.
pub type RuleStore = dyn ScopedStore<Rule>;

impl ScopedEntity for Rule {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.metadata.as_ref().and_then(|m| m.created_at)
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.metadata.as_ref().and_then(|m| m.updated_at)
    }

    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        let meta = self.metadata.get_or_insert_with(RuleMetadata::default);
        meta.created_at = Some(created_at);
        meta.updated_at = Some(updated_at);
    }
}
