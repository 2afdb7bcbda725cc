//! Limit Order Agent Binary
//!
//! Starts the agent with the monitor loop running until Ctrl-C.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin limit-order-agent
//! ```
//!
//! # Environment Variables
//!
//! - `AGENT_DRY_RUN`: Run against the simulated venue (default: true)
//! - `AGENT_RPC_URL`: JSON-RPC endpoint for live mode (default: <http://localhost:8545>)
//! - `AGENT_RECIPIENT`: Swap output recipient, required in live mode
//! - `AGENT_POOL`: Pool to probe on-chain in live mode, as
//!   `pool_id,TOKEN:index:decimals,TOKEN:index:decimals`
//! - `AGENT_TICK_INTERVAL_MS`: Monitor tick interval (default: 1000)
//! - `AGENT_PRICE_CACHE_TTL_SECS`: Price cache TTL (default: 30)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use rust_decimal::Decimal;
use tokio::signal;

use limit_order_agent::application::ports::{ChainClientPort, PriceSourcePort, TokenServicePort};
use limit_order_agent::application::services::PriceResolver;
use limit_order_agent::config::{AgentConfig, LegSpec};
use limit_order_agent::engine::{LimitOrderEngine, MonitorConfig};
use limit_order_agent::execution::SwapExecutor;
use limit_order_agent::infrastructure::chain::{
    JsonRpcTransport, RpcChainClient, SimulatedChainClient,
};
use limit_order_agent::infrastructure::order_log::TracingOrderLog;
use limit_order_agent::infrastructure::price_source::{
    HttpPriceSource, OnChainPriceSource, OneInchPriceSource, PoolLeg, StaticRateSource,
};
use limit_order_agent::infrastructure::token::{RpcTokenService, StaticTokenTable};
use limit_order_agent::telemetry::init_telemetry;
use limit_order_agent::domain::shared::{PoolId, TokenSymbol};

const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";
const ONE_INCH_BASE_URL: &str = "https://api.1inch.io/v5.0/1";

struct Wiring {
    chain: Arc<dyn ChainClientPort>,
    tokens: Arc<dyn TokenServicePort>,
    sources: Vec<Arc<dyn PriceSourcePort>>,
}

/// Simulated venue with one USDC/WETH pool so a dry run works out of
/// the box.
fn wire_dry_run() -> anyhow::Result<Wiring> {
    let usdc_per_weth = Decimal::from(2_000);
    let weth_per_usdc = Decimal::new(5, 4);

    let venue = SimulatedChainClient::new();
    let pool = PoolId::new("tricrypto");
    venue.set_rate(&pool, 0, 1, weth_per_usdc, 6, 18);
    venue.set_rate(&pool, 1, 0, usdc_per_weth, 18, 6);

    let rates = StaticRateSource::new();
    rates.set_rate(
        &TokenSymbol::new("USDC"),
        &TokenSymbol::new("WETH"),
        weth_per_usdc,
    );
    rates.set_rate(
        &TokenSymbol::new("WETH"),
        &TokenSymbol::new("USDC"),
        usdc_per_weth,
    );

    let http = HttpPriceSource::new(COINGECKO_BASE_URL).context("http price source")?;

    Ok(Wiring {
        chain: Arc::new(venue),
        tokens: Arc::new(StaticTokenTable::with_defaults()),
        sources: vec![Arc::new(http), Arc::new(rates)],
    })
}

/// Live price chain: aggregator first, a second aggregator behind it,
/// then the configured pool queried directly on-chain.
fn wire_live(config: &AgentConfig) -> anyhow::Result<Wiring> {
    let chain: Arc<dyn ChainClientPort> =
        Arc::new(RpcChainClient::new(config.rpc_url.clone()).context("rpc chain client")?);
    let transport =
        Arc::new(JsonRpcTransport::new(config.rpc_url.clone()).context("rpc transport")?);

    let http = HttpPriceSource::new(COINGECKO_BASE_URL).context("http price source")?;
    let one_inch = OneInchPriceSource::new(ONE_INCH_BASE_URL).context("1inch price source")?;
    let mut sources: Vec<Arc<dyn PriceSourcePort>> = vec![Arc::new(http), Arc::new(one_inch)];

    if let Some(spec) = &config.pool {
        let leg = |side: &LegSpec| PoolLeg {
            token: TokenSymbol::new(side.token.clone()),
            index: side.index,
            decimals: side.decimals,
        };
        sources.push(Arc::new(OnChainPriceSource::new(
            chain.clone(),
            PoolId::new(spec.id.clone()),
            leg(&spec.first),
            leg(&spec.second),
        )));
    }

    Ok(Wiring {
        chain,
        tokens: Arc::new(RpcTokenService::new(transport)),
        sources,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let config = AgentConfig::from_env().context("loading configuration")?;
    tracing::info!(
        dry_run = config.dry_run,
        tick_interval_ms = config.tick_interval_ms,
        "starting limit order agent"
    );

    let wiring = if config.dry_run {
        wire_dry_run()?
    } else {
        wire_live(&config)?
    };

    let tokens: Arc<dyn TokenServicePort> = if config.token_decimals.is_empty() {
        wiring.tokens
    } else {
        let table = StaticTokenTable::with_defaults();
        for (symbol, decimals) in &config.token_decimals {
            table.set_decimals(&TokenSymbol::new(symbol.clone()), *decimals);
        }
        Arc::new(table)
    };

    let resolver = Arc::new(PriceResolver::with_ttl(
        wiring.sources,
        config.price_cache_ttl(),
    ));
    let executor = Arc::new(SwapExecutor::new(
        wiring.chain.clone(),
        tokens,
        config.recipient.clone(),
        config.dry_run,
    ));

    let engine = LimitOrderEngine::new(
        resolver,
        wiring.chain,
        executor,
        Arc::new(TracingOrderLog::new()),
        MonitorConfig {
            tick_interval: config.tick_interval(),
            backoff: config.loop_backoff(),
        },
    );

    engine.start();
    tracing::info!("agent running, press Ctrl-C to stop");

    signal::ctrl_c().await.context("waiting for shutdown")?;
    tracing::info!("shutdown requested");
    engine.stop().await;
    tracing::info!("agent stopped");

    Ok(())
}
