//! Order aggregate.
//!
//! Immutable identity plus mutable lifecycle state for one user intent.
//! All status mutations are routed through [`OrderStateMachine`] so a
//! terminal order can never move again.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{OrderId, PoolId, TokenSymbol, TxRef};

use super::errors::OrderError;
use super::policy::FillPolicy;
use super::state_machine::OrderStateMachine;
use super::status::OrderStatus;

/// Maximum slippage tolerance: 10000 bps = 100%.
pub const MAX_SLIPPAGE_BPS: u16 = 10_000;

/// Command to create a new order.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    /// Token being sold.
    pub sell_token: TokenSymbol,
    /// Token being bought.
    pub buy_token: TokenSymbol,
    /// Pool used for pricing and execution.
    pub pool: PoolId,
    /// Venue slot index of the sell token.
    pub sell_index: i32,
    /// Venue slot index of the buy token.
    pub buy_index: i32,
    /// Amount to sell, in the sell token's smallest unit.
    pub amount_in: u64,
    /// Target rate: buy-units per one human-unit of sell token.
    pub target_price: Decimal,
    /// Fill policy.
    pub policy: FillPolicy,
    /// Slippage tolerance in basis points.
    pub max_slippage_bps: u16,
    /// Expiry timestamp; required for `GoodTillTime`.
    pub expiry: Option<DateTime<Utc>>,
    /// Free-text metadata.
    pub note: String,
}

/// A limit order being worked by the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    sell_token: TokenSymbol,
    buy_token: TokenSymbol,
    pool: PoolId,
    sell_index: i32,
    buy_index: i32,
    amount_in: u64,
    target_price: Decimal,
    policy: FillPolicy,
    max_slippage_bps: u16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expiry: Option<DateTime<Utc>>,
    status: OrderStatus,
    failure_reason: Option<String>,
    tx_ref: Option<TxRef>,
    note: String,
}

impl Order {
    /// Create a new order in state `New`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if any invariant is violated.
    pub fn new(command: CreateOrderCommand) -> Result<Self, OrderError> {
        Self::validate(&command)?;

        let now = Utc::now();
        Ok(Self {
            id: OrderId::generate(),
            sell_token: command.sell_token,
            buy_token: command.buy_token,
            pool: command.pool,
            sell_index: command.sell_index,
            buy_index: command.buy_index,
            amount_in: command.amount_in,
            target_price: command.target_price,
            policy: command.policy,
            max_slippage_bps: command.max_slippage_bps,
            created_at: now,
            updated_at: now,
            expiry: command.expiry,
            status: OrderStatus::New,
            failure_reason: None,
            tx_ref: None,
            note: command.note,
        })
    }

    fn validate(command: &CreateOrderCommand) -> Result<(), OrderError> {
        if command.sell_token.is_empty() {
            return Err(OrderError::validation("sell_token must not be empty"));
        }
        if command.buy_token.is_empty() {
            return Err(OrderError::validation("buy_token must not be empty"));
        }
        if command.pool.as_str().is_empty() {
            return Err(OrderError::validation("pool must not be empty"));
        }
        if command.sell_token == command.buy_token {
            return Err(OrderError::validation(
                "sell_token and buy_token must differ",
            ));
        }
        if command.sell_index == command.buy_index {
            return Err(OrderError::validation(
                "sell_index and buy_index must differ",
            ));
        }
        if command.amount_in == 0 {
            return Err(OrderError::validation("amount_in must be positive"));
        }
        if command.target_price <= Decimal::ZERO {
            return Err(OrderError::validation("target_price must be positive"));
        }
        if command.max_slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(OrderError::validation(
                "max_slippage_bps must not exceed 10000",
            ));
        }
        if command.policy.requires_expiry() && command.expiry.is_none() {
            return Err(OrderError::validation(
                "good-till-time orders require an expiry",
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Order identifier.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Token being sold.
    #[must_use]
    pub const fn sell_token(&self) -> &TokenSymbol {
        &self.sell_token
    }

    /// Token being bought.
    #[must_use]
    pub const fn buy_token(&self) -> &TokenSymbol {
        &self.buy_token
    }

    /// Pool used for pricing and execution.
    #[must_use]
    pub const fn pool(&self) -> &PoolId {
        &self.pool
    }

    /// Venue slot index of the sell token.
    #[must_use]
    pub const fn sell_index(&self) -> i32 {
        self.sell_index
    }

    /// Venue slot index of the buy token.
    #[must_use]
    pub const fn buy_index(&self) -> i32 {
        self.buy_index
    }

    /// Amount to sell, in the sell token's smallest unit.
    #[must_use]
    pub const fn amount_in(&self) -> u64 {
        self.amount_in
    }

    /// Target rate: buy-units per one human-unit of sell token.
    #[must_use]
    pub const fn target_price(&self) -> Decimal {
        self.target_price
    }

    /// Fill policy.
    #[must_use]
    pub const fn policy(&self) -> FillPolicy {
        self.policy
    }

    /// Slippage tolerance in basis points.
    #[must_use]
    pub const fn max_slippage_bps(&self) -> u16 {
        self.max_slippage_bps
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last state transition.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Expiry timestamp, if any.
    #[must_use]
    pub const fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Failure reason; set only on `Failed`.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Settlement reference; set only on `Filled`.
    #[must_use]
    pub const fn tx_ref(&self) -> Option<&TxRef> {
        self.tx_ref.as_ref()
    }

    /// Free-text metadata.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether the order has passed its expiry at the given instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| now > expiry)
    }

    /// Whether the order has passed its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the order is eligible for an execution attempt.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.status == OrderStatus::Working && !self.is_expired()
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn transition_to(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, to)?;
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move the order into the active registry state.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not `New`.
    pub fn mark_working(&mut self) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Working)
    }

    /// Record a successful execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not `Working`.
    pub fn mark_filled(&mut self, tx_ref: TxRef) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Filled)?;
        self.tx_ref = Some(tx_ref);
        Ok(())
    }

    /// Cancel the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not `Working`.
    pub fn mark_canceled(&mut self) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Canceled)
    }

    /// Expire the order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not `Working`.
    pub fn mark_expired(&mut self) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Expired)
    }

    /// Record a failed execution attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not `Working`.
    pub fn mark_failed(&mut self, reason: impl Into<String>) -> Result<(), OrderError> {
        self.transition_to(OrderStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }
}
