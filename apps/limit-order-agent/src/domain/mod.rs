//! Domain layer: order lifecycle, fill policies, pricing math.

pub mod order;
pub mod policy;
pub mod pricing;
pub mod shared;
