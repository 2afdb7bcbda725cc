//! In-memory registry of working orders.
//!
//! The book only holds orders in `Working` state. Terminal transitions
//! remove the order from the book and hand the terminal snapshot back to
//! the caller, so the first terminal transition wins any race and every
//! later attempt sees `NotFound`.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};

use crate::domain::order::{Order, OrderError, OrderStatus};
use crate::domain::shared::{OrderId, TxRef};
use crate::execution::ExecutionResult;

/// Terminal transition applied to a working order.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Execution succeeded with a settlement reference.
    Filled(TxRef),
    /// User or policy cancellation.
    Canceled,
    /// Expiry passed.
    Expired,
    /// Execution attempt failed.
    Failed(String),
}

/// Thread-safe registry of working orders.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl OrderBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a working order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if the order is not `Working`.
    pub fn insert(&self, order: Order) -> Result<(), OrderError> {
        if order.status() != OrderStatus::Working {
            return Err(OrderError::validation(
                "only working orders can enter the book",
            ));
        }
        self.orders.lock().insert(order.id().clone(), order);
        Ok(())
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.lock().get(id).cloned()
    }

    /// Number of working orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.lock().len()
    }

    /// Whether the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.lock().is_empty()
    }

    /// Snapshot of all working orders, taken under the lock and then
    /// released so evaluation never blocks submissions.
    #[must_use]
    pub fn snapshot_working(&self) -> Vec<Order> {
        self.orders.lock().values().cloned().collect()
    }

    /// Apply a terminal transition and remove the order from the book.
    ///
    /// Returns the terminal order snapshot.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` when the order is not in the book
    /// (never inserted, or already terminal).
    pub fn transition(&self, id: &OrderId, transition: Transition) -> Result<Order, OrderError> {
        let mut orders = self.orders.lock();
        let order = orders.get_mut(id).ok_or_else(|| OrderError::NotFound {
            order_id: id.as_str().to_string(),
        })?;

        match transition {
            Transition::Filled(tx_ref) => order.mark_filled(tx_ref)?,
            Transition::Canceled => order.mark_canceled()?,
            Transition::Expired => order.mark_expired()?,
            Transition::Failed(reason) => order.mark_failed(reason)?,
        }

        // The entry was just mutated under the same lock, so it is present.
        Ok(orders
            .remove(id)
            .unwrap_or_else(|| unreachable!("order removed while lock held")))
    }

    /// Cancel an order. Returns `true` when this call performed the
    /// cancellation, `false` when the order was already gone.
    pub fn cancel(&self, id: &OrderId) -> Option<Order> {
        self.transition(id, Transition::Canceled).ok()
    }
}

/// Terminal execution results, kept after orders leave the book.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: RwLock<HashMap<OrderId, ExecutionResult>>,
}

impl ResultStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of an execution attempt.
    pub fn record(&self, id: OrderId, result: ExecutionResult) {
        self.results.write().insert(id, result);
    }

    /// Fetch the recorded result for an order, if any.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<ExecutionResult> {
        self.results.read().get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{CreateOrderCommand, FillPolicy};
    use crate::domain::shared::{PoolId, TokenSymbol};
    use rust_decimal_macros::dec;

    fn working_order() -> Order {
        let mut order = Order::new(CreateOrderCommand {
            sell_token: TokenSymbol::new("USDC"),
            buy_token: TokenSymbol::new("WETH"),
            pool: PoolId::new("tricrypto"),
            sell_index: 0,
            buy_index: 1,
            amount_in: 1_000_000,
            target_price: dec!(0.0005),
            policy: FillPolicy::GoodTillCanceled,
            max_slippage_bps: 50,
            expiry: None,
            note: String::new(),
        })
        .unwrap();
        order.mark_working().unwrap();
        order
    }

    #[test]
    fn insert_and_get() {
        let book = OrderBook::new();
        let order = working_order();
        let id = order.id().clone();

        book.insert(order).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&id).unwrap().status(), OrderStatus::Working);
    }

    #[test]
    fn rejects_non_working_orders() {
        let book = OrderBook::new();
        let order = Order::new(CreateOrderCommand {
            sell_token: TokenSymbol::new("USDC"),
            buy_token: TokenSymbol::new("WETH"),
            pool: PoolId::new("tricrypto"),
            sell_index: 0,
            buy_index: 1,
            amount_in: 1,
            target_price: dec!(1),
            policy: FillPolicy::GoodTillCanceled,
            max_slippage_bps: 0,
            expiry: None,
            note: String::new(),
        })
        .unwrap();

        assert!(book.insert(order).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn fill_removes_and_returns_terminal_order() {
        let book = OrderBook::new();
        let order = working_order();
        let id = order.id().clone();
        book.insert(order).unwrap();

        let filled = book
            .transition(&id, Transition::Filled(TxRef::new("0xdead")))
            .unwrap();
        assert_eq!(filled.status(), OrderStatus::Filled);
        assert_eq!(filled.tx_ref().unwrap().as_str(), "0xdead");
        assert!(book.get(&id).is_none());
    }

    #[test]
    fn second_terminal_transition_sees_not_found() {
        let book = OrderBook::new();
        let order = working_order();
        let id = order.id().clone();
        book.insert(order).unwrap();

        book.transition(&id, Transition::Canceled).unwrap();
        let err = book
            .transition(&id, Transition::Filled(TxRef::new("0x1")))
            .unwrap_err();
        assert!(matches!(err, OrderError::NotFound { .. }));
    }

    #[test]
    fn cancel_is_idempotent() {
        let book = OrderBook::new();
        let order = working_order();
        let id = order.id().clone();
        book.insert(order).unwrap();

        assert!(book.cancel(&id).is_some());
        assert!(book.cancel(&id).is_none());
    }

    #[test]
    fn failed_transition_carries_reason() {
        let book = OrderBook::new();
        let order = working_order();
        let id = order.id().clone();
        book.insert(order).unwrap();

        let failed = book
            .transition(&id, Transition::Failed("pool reverted".to_string()))
            .unwrap();
        assert_eq!(failed.failure_reason(), Some("pool reverted"));
    }

    #[test]
    fn snapshot_is_detached_from_the_book() {
        let book = OrderBook::new();
        book.insert(working_order()).unwrap();
        book.insert(working_order()).unwrap();

        let snapshot = book.snapshot_working();
        assert_eq!(snapshot.len(), 2);

        let id = snapshot[0].id().clone();
        book.cancel(&id);
        assert_eq!(snapshot.len(), 2, "snapshot unaffected by later changes");
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn result_store_round_trip() {
        let store = ResultStore::new();
        let order = working_order();
        let id = order.id().clone();

        assert!(store.get(&id).is_none());
        store.record(id.clone(), ExecutionResult::failure("boom"));
        let result = store.get(&id).unwrap();
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("boom"));
    }
}
