//! Agent configuration.
//!
//! Loaded from environment variables with sensible defaults, so a dry
//! run needs no configuration at all. Every field also has a serde
//! default for embedding the config in other tooling.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was present but not parseable.
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name.
        name: String,
        /// Offending value.
        value: String,
    },

    /// Validation failed after loading.
    #[error("config validation failed: {0}")]
    Validation(String),
}

/// Root agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// JSON-RPC endpoint for live chain access.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Recipient address for swap output.
    #[serde(default)]
    pub recipient: String,
    /// Monitor tick interval in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Back off this long after a failed tick, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub loop_backoff_ms: u64,
    /// Price cache TTL in seconds.
    #[serde(default = "default_price_cache_ttl_secs")]
    pub price_cache_ttl_secs: u64,
    /// Run against the simulated venue instead of the chain.
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    /// Decimals overrides per token symbol.
    #[serde(default)]
    pub token_decimals: HashMap<String, u8>,
    /// Pool to probe for on-chain prices in live mode.
    #[serde(default)]
    pub pool: Option<PoolSpec>,
}

/// One side of a configured pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegSpec {
    /// Token symbol or address.
    pub token: String,
    /// Coin index inside the pool.
    pub index: i32,
    /// On-chain decimals of the token.
    pub decimals: u8,
}

/// A two-leg pool the agent can query directly for a spot price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSpec {
    /// Pool contract address or identifier.
    pub id: String,
    /// First leg.
    pub first: LegSpec,
    /// Second leg.
    pub second: LegSpec,
}

impl PoolSpec {
    /// Parse the `AGENT_POOL` wire format:
    /// `pool_id,TOKEN:index:decimals,TOKEN:index:decimals`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the string does not
    /// match the format.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: "AGENT_POOL".to_string(),
            value: value.to_string(),
        };

        let mut parts = value.split(',');
        let id = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
        let first = parts.next().ok_or_else(invalid)?;
        let second = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }

        let parse_leg = |leg: &str| -> Result<LegSpec, ConfigError> {
            let mut fields = leg.split(':');
            let token = fields.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
            let index = fields
                .next()
                .and_then(|s| s.parse::<i32>().ok())
                .ok_or_else(invalid)?;
            let decimals = fields
                .next()
                .and_then(|s| s.parse::<u8>().ok())
                .ok_or_else(invalid)?;
            if fields.next().is_some() {
                return Err(invalid());
            }
            Ok(LegSpec {
                token: token.to_string(),
                index,
                decimals,
            })
        };

        let first = parse_leg(first)?;
        let second = parse_leg(second)?;
        if first.index == second.index {
            return Err(invalid());
        }

        Ok(Self {
            id: id.to_string(),
            first,
            second,
        })
    }
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_backoff_ms() -> u64 {
    1_000
}

const fn default_price_cache_ttl_secs() -> u64 {
    30
}

const fn default_dry_run() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            recipient: String::new(),
            tick_interval_ms: default_tick_interval_ms(),
            loop_backoff_ms: default_backoff_ms(),
            price_cache_ttl_secs: default_price_cache_ttl_secs(),
            dry_run: default_dry_run(),
            token_decimals: HashMap::new(),
            pool: None,
        }
    }
}

impl AgentConfig {
    /// Load the configuration from environment variables.
    ///
    /// Recognized variables: `AGENT_RPC_URL`, `AGENT_RECIPIENT`,
    /// `AGENT_TICK_INTERVAL_MS`, `AGENT_LOOP_BACKOFF_MS`,
    /// `AGENT_PRICE_CACHE_TTL_SECS`, `AGENT_DRY_RUN`, `AGENT_POOL`
    /// (format `pool_id,TOKEN:index:decimals,TOKEN:index:decimals`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is present but malformed,
    /// or when the resulting config fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("AGENT_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(recipient) = std::env::var("AGENT_RECIPIENT") {
            config.recipient = recipient;
        }
        if let Some(value) = parse_env("AGENT_TICK_INTERVAL_MS")? {
            config.tick_interval_ms = value;
        }
        if let Some(value) = parse_env("AGENT_LOOP_BACKOFF_MS")? {
            config.loop_backoff_ms = value;
        }
        if let Some(value) = parse_env("AGENT_PRICE_CACHE_TTL_SECS")? {
            config.price_cache_ttl_secs = value;
        }
        if let Ok(value) = std::env::var("AGENT_DRY_RUN") {
            config.dry_run = match value.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(ConfigError::InvalidValue {
                        name: "AGENT_DRY_RUN".to_string(),
                        value: other.to_string(),
                    });
                }
            };
        }
        if let Ok(value) = std::env::var("AGENT_POOL") {
            config.pool = Some(PoolSpec::parse(&value)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` on the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if !self.dry_run && self.rpc_url.is_empty() {
            return Err(ConfigError::Validation(
                "rpc_url is required when dry_run is disabled".to_string(),
            ));
        }
        if !self.dry_run && self.recipient.is_empty() {
            return Err(ConfigError::Validation(
                "recipient is required when dry_run is disabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Tick interval as a `Duration`.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Tick-failure backoff as a `Duration`.
    #[must_use]
    pub const fn loop_backoff(&self) -> Duration {
        Duration::from_millis(self.loop_backoff_ms)
    }

    /// Price cache TTL as a `Duration`.
    #[must_use]
    pub const fn price_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.price_cache_ttl_secs)
    }
}

fn parse_env(name: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_valid_dry_run() {
        let config = AgentConfig::default();
        assert!(config.dry_run);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.price_cache_ttl(), Duration::from_secs(30));
        config.validate().unwrap();
    }

    #[test]
    fn live_mode_requires_a_recipient() {
        let config = AgentConfig {
            dry_run: false,
            recipient: String::new(),
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AgentConfig {
            dry_run: false,
            recipient: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_string(),
            ..AgentConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = AgentConfig {
            tick_interval_ms: 0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn pool_spec_parses_the_wire_format() {
        let spec = PoolSpec::parse("0xd51a44d3fae010294c616388b506acda1bfaae46,USDT:0:6,WETH:2:18")
            .unwrap();
        assert_eq!(spec.id, "0xd51a44d3fae010294c616388b506acda1bfaae46");
        assert_eq!(spec.first.token, "USDT");
        assert_eq!(spec.first.index, 0);
        assert_eq!(spec.first.decimals, 6);
        assert_eq!(spec.second.token, "WETH");
        assert_eq!(spec.second.index, 2);
        assert_eq!(spec.second.decimals, 18);
    }

    #[test]
    fn malformed_pool_specs_are_rejected() {
        for bad in [
            "",
            "pool-only",
            "pool,USDT:0:6",
            "pool,USDT:0:6,WETH:2:18,extra",
            "pool,USDT:zero:6,WETH:2:18",
            "pool,USDT:0:6,WETH:0:18",
            "pool,:0:6,WETH:2:18",
        ] {
            assert!(PoolSpec::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let config: AgentConfig = serde_json::from_str("{}").unwrap();
        assert!(config.dry_run);
        assert_eq!(config.tick_interval_ms, 1_000);
        assert_eq!(config.rpc_url, "http://localhost:8545");
    }
}
