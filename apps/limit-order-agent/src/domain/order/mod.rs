//! Order aggregate, lifecycle states, and fill policies.

mod aggregate;
mod errors;
mod policy;
mod state_machine;
mod status;

pub use aggregate::{CreateOrderCommand, MAX_SLIPPAGE_BPS, Order};
pub use errors::OrderError;
pub use policy::FillPolicy;
pub use state_machine::OrderStateMachine;
pub use status::OrderStatus;
