use std::collections::HashMap;
use std::sync::Arc;

use flowarden_core::ActionKind;

use crate::comment::AddCommentHandler;
use crate::handler::DynActionHandler;
use crate::label::{AddLabelHandler, RemoveLabelHandler};

/// A registry that maps action kinds to their handlers.
///
/// Built once at startup and then shared immutably, usually inside an
/// [`ActionDispatcher`](crate::ActionDispatcher).
pub struct HandlerRegistry {
    handlers: HashMap<ActionKind, Arc<dyn DynActionHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry holding the built-in stand-ins for `addLabel`,
    /// `removeLabel` and `addComment`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AddLabelHandler));
        registry.register(Arc::new(RemoveLabelHandler));
        registry.register(Arc::new(AddCommentHandler));
        registry
    }

    /// Register a handler under its own kind, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn DynActionHandler>) {
        self.handlers.insert(handler.kind(), handler);
    }

    pub fn get(&self, kind: &ActionKind) -> Option<Arc<dyn DynActionHandler>> {
        self.handlers.get(kind).cloned()
    }

    /// Sorted tags of all registered kinds.
    pub fn list(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.handlers.keys().map(ActionKind::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
