//! Pure policy evaluation.
//!
//! Maps (order, current price, available liquidity) to a decision. No
//! clocks besides the order's own expiry check, no I/O, no locks — the
//! monitor loop owns all side effects.

use rust_decimal::Decimal;

use crate::domain::order::{FillPolicy, Order};

/// What the engine should do with an order this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Leave the order Working and re-evaluate next tick.
    Wait,
    /// Attempt execution at the current price.
    Execute,
    /// Terminate the order; Expired when the cause is time, Canceled
    /// otherwise.
    CancelOrExpire,
}

/// A policy decision with its reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    /// Action to take.
    pub action: PolicyAction,
    /// Why the action was chosen.
    pub reason: String,
}

impl PolicyDecision {
    fn wait(reason: impl Into<String>) -> Self {
        Self {
            action: PolicyAction::Wait,
            reason: reason.into(),
        }
    }

    fn execute(reason: impl Into<String>) -> Self {
        Self {
            action: PolicyAction::Execute,
            reason: reason.into(),
        }
    }

    fn cancel(reason: impl Into<String>) -> Self {
        Self {
            action: PolicyAction::CancelOrExpire,
            reason: reason.into(),
        }
    }
}

/// Policy evaluator service.
pub struct PolicyEvaluator;

impl PolicyEvaluator {
    /// Evaluate an order against the current market state.
    ///
    /// Expiry takes precedence over every policy: an expired order is
    /// terminated even at a favorable price.
    #[must_use]
    pub fn evaluate(
        order: &Order,
        current_price: Decimal,
        available_liquidity: u64,
    ) -> PolicyDecision {
        if order.is_expired() {
            return PolicyDecision::cancel("order expired");
        }

        if !order.can_execute() {
            // Not Working; the engine should not have offered it.
            return PolicyDecision::wait("order not in executable state");
        }

        match order.policy() {
            FillPolicy::GoodTillCanceled => Self::evaluate_gtc(order, current_price),
            FillPolicy::GoodTillTime => Self::evaluate_gtt(order, current_price),
            FillPolicy::ImmediateOrCancel => {
                Self::evaluate_ioc(order, current_price, available_liquidity)
            }
            FillPolicy::FillOrKill => {
                Self::evaluate_fok(order, current_price, available_liquidity)
            }
        }
    }

    fn evaluate_gtc(order: &Order, current_price: Decimal) -> PolicyDecision {
        if Self::is_price_acceptable(order, current_price) {
            PolicyDecision::execute("target price reached")
        } else {
            PolicyDecision::wait("waiting for target price")
        }
    }

    fn evaluate_gtt(order: &Order, current_price: Decimal) -> PolicyDecision {
        // Expiry is checked at the top of evaluate(); re-check here so the
        // branch stays safe if called directly.
        if order.is_expired() {
            return PolicyDecision::cancel("order expired");
        }

        if Self::is_price_acceptable(order, current_price) {
            PolicyDecision::execute("target price reached")
        } else {
            PolicyDecision::wait("waiting for target price before expiry")
        }
    }

    fn evaluate_ioc(
        order: &Order,
        current_price: Decimal,
        available_liquidity: u64,
    ) -> PolicyDecision {
        if !Self::is_price_acceptable(order, current_price) {
            return PolicyDecision::cancel("price not met");
        }

        // IOC takes whatever is available; the executor fills what it can.
        if available_liquidity > 0 && available_liquidity < order.amount_in() {
            PolicyDecision::execute("executing partial fill")
        } else {
            PolicyDecision::execute("executing full order")
        }
    }

    fn evaluate_fok(
        order: &Order,
        current_price: Decimal,
        available_liquidity: u64,
    ) -> PolicyDecision {
        if !Self::is_price_acceptable(order, current_price) {
            return PolicyDecision::cancel("price not met");
        }

        if !Self::has_enough_liquidity(order, available_liquidity) {
            return PolicyDecision::cancel("insufficient liquidity");
        }

        PolicyDecision::execute("executing full order")
    }

    /// Acceptability shared by every policy: the current rate (buy per
    /// sell, higher is better for the seller) must reach the target.
    #[must_use]
    pub fn is_price_acceptable(order: &Order, current_price: Decimal) -> bool {
        current_price >= order.target_price()
    }

    /// Whether the venue can absorb the full order amount.
    #[must_use]
    pub fn has_enough_liquidity(order: &Order, available_liquidity: u64) -> bool {
        available_liquidity >= order.amount_in()
    }
}
