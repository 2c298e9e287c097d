pub mod condition;
pub mod rule;
