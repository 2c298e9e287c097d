pub mod builder;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod workflow;

pub use builder::GatewayBuilder;
pub use error::GatewayError;
pub use gateway::{EventReport, Gateway};
pub use metrics::{GatewayMetrics, MetricsSnapshot};
pub use workflow::{WorkflowEngine, WorkflowExecutionResult, WorkflowStepExecution};
