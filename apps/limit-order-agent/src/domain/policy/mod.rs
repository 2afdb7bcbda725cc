//! Fill-policy evaluation.

mod evaluator;

pub use evaluator::{PolicyAction, PolicyDecision, PolicyEvaluator};
