// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Limit Order Agent - Rust Core Library
//!
//! Works limit orders against an AMM venue: accepts orders, watches
//! prices, and settles swaps when a fill policy says so.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic with no I/O
//!   - `order`: Order aggregate, fill policies, status lifecycle
//!   - `policy`: Pure policy evaluation (GTC, GTT, IOC, FOK)
//!   - `pricing`: Amount/price arithmetic and the slippage floor
//!   - `shared`: Typed identifiers and value objects
//!
//! - **Application**: Orchestration over port interfaces
//!   - `ports`: `ChainClientPort`, `PriceSourcePort`, `TokenServicePort`, `OrderLogPort`
//!   - `services`: Multi-source `PriceResolver` with a short-lived cache
//!
//! - **Engine**: The working core
//!   - `book`: Registry of working orders, single point of state transitions
//!   - `monitor`: Tick loop evaluating policies and applying outcomes
//!   - `LimitOrderEngine`: Public facade (submit, cancel, status, start/stop)
//!
//! - **Execution**: Swap settlement (simulated or live)
//!
//! - **Infrastructure**: Adapters behind the ports
//!   - `chain`: Simulated venue, JSON-RPC client
//!   - `price_source`: HTTP cross-rate, on-chain probe, static table
//!   - `token`: Static table, ERC-20 over JSON-RPC
//!   - `order_log`: Tracing-backed event log

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Services and port definitions.
pub mod application;

/// Engine layer - Order book, monitor loop, and the public facade.
pub mod engine;

/// Execution layer - Swap settlement.
pub mod execution;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Agent configuration.
pub mod config;

/// Tracing setup.
pub mod telemetry;

pub use engine::{LimitOrderEngine, MonitorConfig};
