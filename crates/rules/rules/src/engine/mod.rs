pub mod eval;
pub mod executor;
pub mod operators;
pub mod path;

pub use eval::evaluate;
pub use executor::{RuleEngine, RuleEvaluation};
pub use path::resolve;
