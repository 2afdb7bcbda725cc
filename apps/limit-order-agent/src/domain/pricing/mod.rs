//! Pricing math shared by the evaluator, executor, and price sources.

pub mod math;
