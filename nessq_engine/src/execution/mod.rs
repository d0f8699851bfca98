pub mod condition;
pub mod engine;

pub use condition::{evaluate_clause, evaluate_condition, FindingContext};
pub use engine::QueryEvaluator;
