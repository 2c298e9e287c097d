pub mod action;
pub mod context;
pub mod error;
pub mod outcome;
pub mod scope;
pub mod types;
pub mod workflow;

pub use action::{ActionIntent, ActionKind, ActionOrigin, ActionSpec};
pub use context::{ActorInfo, EventContext, EventInfo, RepositoryInfo, UNKNOWN_EVENT};
pub use error::FlowardenError;
pub use outcome::ActionResult;
pub use scope::ScopeKey;
pub use types::{RuleId, StepId, WorkflowId};
pub use workflow::{
    CreatedBy, MAX_NAME_LEN, MAX_STEPS, SUPPORTED_WORKFLOW_ACTIONS, SUPPORTED_WORKFLOW_EVENTS,
    ValidationError, Workflow, WorkflowMetadata, WorkflowPatch, WorkflowStep, WorkflowTrigger,
    validate_workflow,
};
