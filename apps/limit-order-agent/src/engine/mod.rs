//! Engine layer: order book, monitor loop, and the public facade.

mod book;
mod monitor;

pub use book::{OrderBook, ResultStore, Transition};
pub use monitor::{MonitorConfig, MonitorLoop};

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ChainClientPort, OrderLogPort};
use crate::application::services::PriceResolver;
use crate::domain::order::{CreateOrderCommand, Order, OrderError};
use crate::domain::shared::OrderId;
use crate::execution::{ExecutionResult, SwapExecutor};

/// The limit-order engine: submission, cancellation, status, and the
/// background monitor that works the book.
pub struct LimitOrderEngine {
    book: Arc<OrderBook>,
    results: Arc<ResultStore>,
    order_log: Arc<dyn OrderLogPort>,
    monitor: Arc<MonitorLoop>,
    shutdown: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LimitOrderEngine {
    /// Wire an engine from its collaborators.
    #[must_use]
    pub fn new(
        resolver: Arc<PriceResolver>,
        chain: Arc<dyn ChainClientPort>,
        executor: Arc<SwapExecutor>,
        order_log: Arc<dyn OrderLogPort>,
        config: MonitorConfig,
    ) -> Self {
        let book = Arc::new(OrderBook::new());
        let results = Arc::new(ResultStore::new());
        let monitor = Arc::new(MonitorLoop::new(
            book.clone(),
            results.clone(),
            resolver,
            chain,
            executor,
            order_log.clone(),
            config,
        ));

        Self {
            book,
            results,
            order_log,
            monitor,
            shutdown: CancellationToken::new(),
            worker: Mutex::new(None),
        }
    }

    /// Validate and register a new order, returning its working snapshot.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` when the command violates an
    /// order invariant.
    pub async fn submit(&self, command: CreateOrderCommand) -> Result<Order, OrderError> {
        let mut order = Order::new(command)?;
        order.mark_working()?;
        self.book.insert(order.clone())?;

        tracing::info!(
            order_id = %order.id(),
            pair = %format!("{}/{}", order.sell_token(), order.buy_token()),
            policy = order.policy().code(),
            amount_in = order.amount_in(),
            target_price = %order.target_price(),
            "order submitted"
        );
        if let Err(e) = self.order_log.append(&order, "SUBMITTED").await {
            tracing::debug!(order_id = %order.id(), error = %e, "order log append failed");
        }

        Ok(order)
    }

    /// Cancel a working order.
    ///
    /// Returns `true` when this call performed the cancellation, `false`
    /// when the order was already terminal or unknown. Idempotent.
    pub async fn cancel(&self, id: &OrderId) -> bool {
        match self.book.cancel(id) {
            Some(canceled) => {
                tracing::info!(order_id = %id, "order canceled");
                if let Err(e) = self.order_log.append(&canceled, "CANCELED").await {
                    tracing::debug!(order_id = %id, error = %e, "order log append failed");
                }
                true
            }
            None => false,
        }
    }

    /// Current snapshot of a working order, if it is still in the book.
    #[must_use]
    pub fn status(&self, id: &OrderId) -> Option<Order> {
        self.book.get(id)
    }

    /// All working orders.
    #[must_use]
    pub fn list_active(&self) -> Vec<Order> {
        self.book.snapshot_working()
    }

    /// Result of the execution attempt for an order, if one was made.
    #[must_use]
    pub fn execution_result(&self, id: &OrderId) -> Option<ExecutionResult> {
        self.results.get(id)
    }

    /// Spawn the background monitor. Calling twice is a no-op.
    pub fn start(&self) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }
        let monitor = self.monitor.clone();
        let token = self.shutdown.clone();
        *worker = Some(tokio::spawn(monitor.run(token)));
    }

    /// Stop the monitor and wait for it to finish.
    pub async fn stop(&self) {
        self.shutdown.cancel();
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "monitor task did not shut down cleanly");
            }
        }
    }

    /// Run one evaluation tick without the background loop. Intended for
    /// deterministic driving in tests and tooling.
    ///
    /// # Errors
    ///
    /// Propagates tick-level faults from the monitor.
    pub async fn tick_once(&self) -> anyhow::Result<()> {
        self.monitor.tick().await
    }
}
