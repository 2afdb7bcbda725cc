//! End-to-end engine tests over the simulated venue.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use limit_order_agent::application::ports::{ChainClientPort, PriceSourcePort};
use limit_order_agent::application::services::PriceResolver;
use limit_order_agent::domain::order::{CreateOrderCommand, FillPolicy, OrderStatus};
use limit_order_agent::domain::shared::{PoolId, TokenSymbol};
use limit_order_agent::engine::{LimitOrderEngine, MonitorConfig};
use limit_order_agent::execution::SwapExecutor;
use limit_order_agent::infrastructure::chain::SimulatedChainClient;
use limit_order_agent::infrastructure::order_log::TracingOrderLog;
use limit_order_agent::infrastructure::price_source::StaticRateSource;
use limit_order_agent::infrastructure::token::StaticTokenTable;

struct Harness {
    engine: LimitOrderEngine,
    rates: Arc<StaticRateSource>,
    venue: Arc<SimulatedChainClient>,
    pool: PoolId,
}

fn usdc() -> TokenSymbol {
    TokenSymbol::new("USDC")
}

fn weth() -> TokenSymbol {
    TokenSymbol::new("WETH")
}

/// Engine over a simulated USDC/WETH pool, both legs at 6 decimals so
/// expected amounts stay easy to read.
fn harness(rate: Decimal) -> Harness {
    let pool = PoolId::new("tricrypto");
    let venue = Arc::new(SimulatedChainClient::new());
    venue.set_rate(&pool, 0, 1, rate, 6, 6);

    let rates = Arc::new(StaticRateSource::new());
    rates.set_rate(&usdc(), &weth(), rate);

    let tokens = StaticTokenTable::new();
    tokens.set_decimals(&usdc(), 6);
    tokens.set_decimals(&weth(), 6);

    let chain: Arc<dyn ChainClientPort> = venue.clone();
    let sources: Vec<Arc<dyn PriceSourcePort>> = vec![rates.clone()];
    let resolver = Arc::new(PriceResolver::with_ttl(
        sources,
        std::time::Duration::ZERO,
    ));
    let executor = Arc::new(SwapExecutor::new(
        chain.clone(),
        Arc::new(tokens),
        "0xrecipient",
        true,
    ));

    let engine = LimitOrderEngine::new(
        resolver,
        chain,
        executor,
        Arc::new(TracingOrderLog::new()),
        MonitorConfig::default(),
    );

    Harness {
        engine,
        rates,
        venue,
        pool,
    }
}

fn command() -> CreateOrderCommand {
    CreateOrderCommand {
        sell_token: usdc(),
        buy_token: weth(),
        pool: PoolId::new("tricrypto"),
        sell_index: 0,
        buy_index: 1,
        amount_in: 1_000_000,
        target_price: dec!(0.0005),
        policy: FillPolicy::GoodTillCanceled,
        max_slippage_bps: 50,
        expiry: None,
        note: String::new(),
    }
}

#[tokio::test]
async fn order_fills_when_the_market_reaches_the_target() {
    let h = harness(dec!(0.0005));
    let order = h.engine.submit(command()).await.unwrap();

    h.engine.tick_once().await.unwrap();

    assert!(h.engine.status(order.id()).is_none());
    let result = h.engine.execution_result(order.id()).unwrap();
    assert!(result.success);
    assert_eq!(result.actual_price, Some(dec!(0.0005)));
    // 1 USDC at 0.0005, both legs 6 decimals.
    assert_eq!(result.actual_amount_out, Some(500));
    assert!(result.tx_ref.is_some());
}

#[tokio::test]
async fn order_keeps_working_below_the_target() {
    let h = harness(dec!(0.0004));
    let order = h.engine.submit(command()).await.unwrap();

    for _ in 0..3 {
        h.engine.tick_once().await.unwrap();
    }

    let status = h.engine.status(order.id()).unwrap();
    assert_eq!(status.status(), OrderStatus::Working);
    assert!(h.engine.execution_result(order.id()).is_none());
}

#[tokio::test]
async fn order_fills_after_the_market_moves() {
    let h = harness(dec!(0.0004));
    let order = h.engine.submit(command()).await.unwrap();

    h.engine.tick_once().await.unwrap();
    assert!(h.engine.status(order.id()).is_some());

    h.rates.set_rate(&usdc(), &weth(), dec!(0.00055));
    h.venue.set_rate(&h.pool, 0, 1, dec!(0.00055), 6, 6);
    h.engine.tick_once().await.unwrap();

    assert!(h.engine.status(order.id()).is_none());
    assert!(h.engine.execution_result(order.id()).unwrap().success);
}

#[tokio::test]
async fn expired_gtt_order_terminates_without_execution() {
    let h = harness(dec!(0.001));
    let mut cmd = command();
    cmd.policy = FillPolicy::GoodTillTime;
    cmd.expiry = Some(chrono::Utc::now() - chrono::Duration::seconds(1));
    let order = h.engine.submit(cmd).await.unwrap();

    h.engine.tick_once().await.unwrap();

    assert!(h.engine.status(order.id()).is_none());
    assert!(h.engine.execution_result(order.id()).is_none());
}

#[tokio::test]
async fn fok_order_is_killed_when_depth_is_short() {
    let h = harness(dec!(0.0005));
    h.venue.set_depth(&h.pool, 0, 1, 400_000);

    let mut cmd = command();
    cmd.policy = FillPolicy::FillOrKill;
    let order = h.engine.submit(cmd).await.unwrap();

    h.engine.tick_once().await.unwrap();

    assert!(h.engine.status(order.id()).is_none());
    assert!(h.engine.execution_result(order.id()).is_none());
}

#[tokio::test]
async fn ioc_order_takes_a_partial_fill() {
    let h = harness(dec!(0.0005));
    h.venue.set_depth(&h.pool, 0, 1, 400_000);

    let mut cmd = command();
    cmd.policy = FillPolicy::ImmediateOrCancel;
    let order = h.engine.submit(cmd).await.unwrap();

    h.engine.tick_once().await.unwrap();

    let result = h.engine.execution_result(order.id()).unwrap();
    assert!(result.success);
    // 0.4 USDC of depth at 0.0005.
    assert_eq!(result.actual_amount_out, Some(200));
}

#[tokio::test]
async fn gtc_order_is_not_shrunk_by_reported_depth() {
    let h = harness(dec!(0.0005));
    h.venue.set_depth(&h.pool, 0, 1, 400_000);
    let order = h.engine.submit(command()).await.unwrap();

    h.engine.tick_once().await.unwrap();

    let result = h.engine.execution_result(order.id()).unwrap();
    assert!(result.success);
    // GTC takes no partials: the full 1.0 sell units settle.
    assert_eq!(result.actual_amount_out, Some(500));
}

#[tokio::test]
async fn cancel_wins_over_a_later_tick() {
    let h = harness(dec!(0.0005));
    let order = h.engine.submit(command()).await.unwrap();

    assert!(h.engine.cancel(order.id()).await);
    assert!(!h.engine.cancel(order.id()).await);

    h.engine.tick_once().await.unwrap();
    assert!(h.engine.execution_result(order.id()).is_none());
}

#[tokio::test]
async fn concurrent_submissions_are_all_registered() {
    let h = harness(dec!(0.0004));
    let engine = Arc::new(h.engine);

    let mut handles = Vec::new();
    for _ in 0..100 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.submit(command()).await.unwrap()
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }

    assert_eq!(engine.list_active().len(), 100);
    for order in &ids {
        assert_eq!(
            engine.status(order.id()).unwrap().status(),
            OrderStatus::Working
        );
    }
}

#[tokio::test]
async fn every_source_failing_falls_back_to_synthetic_without_filling() {
    // No rate configured: the static source declines every call, so each
    // tick evaluates against the synthetic fallback. The target is far
    // above the synthetic band, so the order must keep working.
    let pool = PoolId::new("tricrypto");
    let venue = Arc::new(SimulatedChainClient::new());
    venue.set_rate(&pool, 0, 1, dec!(0.0005), 6, 6);

    let chain: Arc<dyn ChainClientPort> = venue;
    let resolver = Arc::new(PriceResolver::new(vec![
        Arc::new(StaticRateSource::new()) as Arc<dyn PriceSourcePort>,
    ]));
    let executor = Arc::new(SwapExecutor::new(
        chain.clone(),
        Arc::new(StaticTokenTable::with_defaults()),
        "0xrecipient",
        true,
    ));
    let engine = LimitOrderEngine::new(
        resolver,
        chain,
        executor,
        Arc::new(TracingOrderLog::new()),
        MonitorConfig::default(),
    );

    let mut cmd = command();
    // Synthetic rates live in [0.5, 2.0); this target is unreachable.
    cmd.target_price = dec!(1000);
    let order = engine.submit(cmd).await.unwrap();

    engine.tick_once().await.unwrap();
    assert_eq!(
        engine.status(order.id()).unwrap().status(),
        OrderStatus::Working
    );
}

#[tokio::test]
async fn background_loop_fills_on_its_own() {
    let h = harness(dec!(0.0005));
    let engine = Arc::new(h.engine);
    let order = engine.submit(command()).await.unwrap();

    engine.start();
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    while engine.execution_result(order.id()).is_none() {
        assert!(std::time::Instant::now() < deadline, "fill timed out");
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    engine.stop().await;

    assert!(engine.execution_result(order.id()).unwrap().success);
}
