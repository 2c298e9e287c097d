pub mod engine;
pub mod error;
pub mod ir;
pub mod store;

pub use engine::{RuleEngine, RuleEvaluation, evaluate, resolve};
pub use error::RuleError;
pub use ir::condition::{ConditionGroup, ConditionLeaf, ConditionNode, Operator};
pub use ir::rule::{EvaluationMode, Rule, RuleMetadata, RuleTrigger};
pub use store::RuleStore;
