//! Execution layer: swap settlement and its results.

mod executor;

pub use executor::{ExecutionResult, SwapExecutor};
