pub mod entity;
pub mod error;
pub mod store;
pub mod testing;

pub use entity::{ScopedEntity, ensure_scope, listing_order, next_updated_at, stamp_created};
pub use error::StoreError;
pub use store::{ScopedStore, WorkflowStore};
