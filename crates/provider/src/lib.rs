pub mod comment;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod label;
pub mod log;
pub mod params;
pub mod registry;

pub use comment::AddCommentHandler;
pub use dispatcher::ActionDispatcher;
pub use error::HandlerError;
pub use handler::{ActionHandler, DynActionHandler};
pub use label::{AddLabelHandler, RemoveLabelHandler};
pub use params::{AddCommentParams, AddLabelParams, RemoveLabelParams};
pub use registry::HandlerRegistry;
