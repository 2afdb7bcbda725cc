//! Monitor loop: the single writer driving order evaluation.
//!
//! Each tick snapshots the book, then evaluates orders one at a time
//! outside the lock. A failure while processing one order is contained
//! to that order; a failure of the whole tick backs off and retries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ChainClientPort, OrderLogPort};
use crate::application::services::PriceResolver;
use crate::domain::order::{FillPolicy, Order};
use crate::domain::policy::{PolicyAction, PolicyEvaluator};
use crate::execution::SwapExecutor;

use super::book::{OrderBook, ResultStore, Transition};

/// Timing knobs for the loop.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Interval between evaluation ticks.
    pub tick_interval: Duration,
    /// Pause after a failed tick before the next attempt.
    pub backoff: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            backoff: Duration::from_secs(1),
        }
    }
}

/// Periodically evaluates working orders and applies the outcomes.
pub struct MonitorLoop {
    book: Arc<OrderBook>,
    results: Arc<ResultStore>,
    resolver: Arc<PriceResolver>,
    chain: Arc<dyn ChainClientPort>,
    executor: Arc<SwapExecutor>,
    order_log: Arc<dyn OrderLogPort>,
    config: MonitorConfig,
}

impl MonitorLoop {
    /// Create a monitor over the shared engine state.
    #[must_use]
    pub fn new(
        book: Arc<OrderBook>,
        results: Arc<ResultStore>,
        resolver: Arc<PriceResolver>,
        chain: Arc<dyn ChainClientPort>,
        executor: Arc<SwapExecutor>,
        order_log: Arc<dyn OrderLogPort>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            book,
            results,
            resolver,
            chain,
            executor,
            order_log,
            config,
        }
    }

    /// Run until the token is cancelled.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            tick_interval_ms = self.config.tick_interval.as_millis(),
            "monitor loop started"
        );

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::info!("monitor loop stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::warn!(error = %e, "tick failed, backing off");
                        tokio::time::sleep(self.config.backoff).await;
                    }
                }
            }
        }
    }

    /// Evaluate every working order once.
    ///
    /// # Errors
    ///
    /// Returns an error only for tick-level faults; per-order failures
    /// are contained and logged.
    pub async fn tick(&self) -> anyhow::Result<()> {
        let snapshot = self.book.snapshot_working();
        if snapshot.is_empty() {
            return Ok(());
        }
        tracing::debug!(orders = snapshot.len(), "evaluating working orders");

        for order in snapshot {
            self.process_order(&order).await;
        }
        Ok(())
    }

    async fn process_order(&self, order: &Order) {
        let quote = self
            .resolver
            .resolve(order.sell_token(), order.buy_token())
            .await;
        if quote.rate <= rust_decimal::Decimal::ZERO {
            tracing::debug!(order_id = %order.id(), "no usable price this tick, skipping");
            return;
        }
        if quote.synthetic {
            tracing::debug!(
                order_id = %order.id(),
                rate = %quote.rate,
                "evaluating against synthetic fallback rate"
            );
        }

        let liquidity = match self
            .chain
            .available_liquidity(
                order.pool(),
                order.sell_index(),
                order.buy_index(),
                order.amount_in(),
            )
            .await
        {
            Ok(available) => available,
            Err(e) => {
                tracing::debug!(
                    order_id = %order.id(),
                    error = %e,
                    "liquidity probe failed, assuming full depth"
                );
                order.amount_in()
            }
        };

        let decision = PolicyEvaluator::evaluate(order, quote.rate, liquidity);
        tracing::debug!(
            order_id = %order.id(),
            policy = order.policy().code(),
            price = %quote.rate,
            source = %quote.source,
            action = ?decision.action,
            reason = %decision.reason,
            "policy decision"
        );

        match decision.action {
            PolicyAction::Wait => {}
            PolicyAction::Execute => self.execute(order, quote.rate, liquidity).await,
            PolicyAction::CancelOrExpire => self.terminate(order, &decision.reason).await,
        }
    }

    async fn execute(&self, order: &Order, price: rust_decimal::Decimal, liquidity: u64) {
        // Only IOC may fill less than the full size. GTC/GTT always trade
        // the full amount (a short depth report must not shrink them), and
        // FOK never reaches Execute without full depth.
        let amount_in = if order.policy() == FillPolicy::ImmediateOrCancel && liquidity > 0 {
            order.amount_in().min(liquidity)
        } else {
            order.amount_in()
        };

        let result = self.executor.execute(order, price, amount_in).await;
        self.results.record(order.id().clone(), result.clone());

        let transition = if result.success {
            // tx_ref is always set on success.
            match result.tx_ref {
                Some(tx_ref) => Transition::Filled(tx_ref),
                None => Transition::Failed("execution succeeded without a tx ref".to_string()),
            }
        } else {
            Transition::Failed(
                result
                    .error
                    .unwrap_or_else(|| "execution failed".to_string()),
            )
        };

        match self.book.transition(order.id(), transition) {
            Ok(terminal) => {
                let event = terminal.status().to_string();
                self.log(&terminal, &event).await;
            }
            Err(e) => {
                // Lost a race with a cancel; the result is still recorded.
                tracing::debug!(order_id = %order.id(), error = %e, "post-execution transition skipped");
            }
        }
    }

    async fn terminate(&self, order: &Order, reason: &str) {
        let transition = if order.is_expired() {
            Transition::Expired
        } else {
            Transition::Canceled
        };

        match self.book.transition(order.id(), transition) {
            Ok(terminal) => {
                tracing::info!(
                    order_id = %order.id(),
                    status = %terminal.status(),
                    reason,
                    "order terminated"
                );
                let event = terminal.status().to_string();
                self.log(&terminal, &event).await;
            }
            Err(e) => {
                tracing::debug!(order_id = %order.id(), error = %e, "termination skipped");
            }
        }
    }

    async fn log(&self, order: &Order, event: &str) {
        if let Err(e) = self.order_log.append(order, event).await {
            tracing::debug!(order_id = %order.id(), error = %e, "order log append failed");
        }
        if let Err(e) = self.order_log.persist(order).await {
            tracing::debug!(order_id = %order.id(), error = %e, "order persist failed");
        }
    }
}
