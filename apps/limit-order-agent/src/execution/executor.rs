//! Swap execution.
//!
//! The executor turns a policy `Execute` decision into a settlement
//! attempt. Every failure is absorbed into an [`ExecutionResult`]; the
//! monitor loop must never be taken down by a bad swap.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::ports::{ChainClientPort, TokenServicePort};
use crate::domain::order::Order;
use crate::domain::pricing::math;
use crate::domain::shared::TxRef;

/// Outcome of one execution attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Whether the swap settled.
    pub success: bool,
    /// Settlement reference on success.
    pub tx_ref: Option<TxRef>,
    /// Failure description on failure.
    pub error: Option<String>,
    /// Rate the attempt was made at.
    pub actual_price: Option<Decimal>,
    /// Output amount in the buy token's smallest unit.
    pub actual_amount_out: Option<u64>,
}

impl ExecutionResult {
    /// Successful settlement.
    #[must_use]
    pub const fn filled(tx_ref: TxRef, actual_price: Decimal, actual_amount_out: u64) -> Self {
        Self {
            success: true,
            tx_ref: Some(tx_ref),
            error: None,
            actual_price: Some(actual_price),
            actual_amount_out: Some(actual_amount_out),
        }
    }

    /// Failed attempt.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_ref: None,
            error: Some(error.into()),
            actual_price: None,
            actual_amount_out: None,
        }
    }
}

/// Executes swaps against the venue, or simulates them in dry-run mode.
pub struct SwapExecutor {
    chain: Arc<dyn ChainClientPort>,
    tokens: Arc<dyn TokenServicePort>,
    recipient: String,
    simulate: bool,
}

impl SwapExecutor {
    /// Create an executor.
    ///
    /// With `simulate` set, swaps settle deterministically without
    /// touching the chain.
    #[must_use]
    pub fn new(
        chain: Arc<dyn ChainClientPort>,
        tokens: Arc<dyn TokenServicePort>,
        recipient: impl Into<String>,
        simulate: bool,
    ) -> Self {
        Self {
            chain,
            tokens,
            recipient: recipient.into(),
            simulate,
        }
    }

    /// Whether this executor is in dry-run mode.
    #[must_use]
    pub const fn is_simulated(&self) -> bool {
        self.simulate
    }

    /// Attempt to execute `amount_in` of the order at `current_price`.
    ///
    /// `amount_in` may be less than the order's full size for partial
    /// fills. Never returns an error: every failure mode is folded into
    /// the result.
    pub async fn execute(
        &self,
        order: &Order,
        current_price: Decimal,
        amount_in: u64,
    ) -> ExecutionResult {
        let sell_decimals = match self.tokens.decimals(order.sell_token()).await {
            Ok(d) => d,
            Err(e) => return ExecutionResult::failure(format!("sell token decimals: {e}")),
        };
        let buy_decimals = match self.tokens.decimals(order.buy_token()).await {
            Ok(d) => d,
            Err(e) => return ExecutionResult::failure(format!("buy token decimals: {e}")),
        };

        let expected = math::expected_output(amount_in, current_price, sell_decimals, buy_decimals);
        if expected == 0 {
            return ExecutionResult::failure("expected output rounds to zero");
        }
        let min_out = math::min_output(expected, order.max_slippage_bps());

        if self.simulate {
            let tx_ref = TxRef::new(format!("sim-{}", order.id()));
            tracing::info!(
                order_id = %order.id(),
                amount_in,
                amount_out = expected,
                min_out,
                price = %current_price,
                "simulated swap settled"
            );
            return ExecutionResult::filled(tx_ref, current_price, expected);
        }

        match self
            .chain
            .swap(
                order.pool(),
                order.sell_index(),
                order.buy_index(),
                amount_in,
                min_out,
                &self.recipient,
            )
            .await
        {
            Ok(tx_ref) => {
                tracing::info!(
                    order_id = %order.id(),
                    tx_ref = %tx_ref,
                    amount_in,
                    min_out,
                    "swap settled"
                );
                ExecutionResult::filled(tx_ref, current_price, expected)
            }
            Err(e) => {
                tracing::warn!(order_id = %order.id(), error = %e, "swap failed");
                ExecutionResult::failure(e.to_string())
            }
        }
    }
}
