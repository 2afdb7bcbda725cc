//! Static token metadata for dry-run operation and tests.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::application::ports::{TokenServiceError, TokenServicePort};
use crate::domain::shared::TokenSymbol;

use async_trait::async_trait;

/// Default decimals for tokens absent from the table.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Token service backed by an in-memory table.
///
/// Unknown tokens fall back to 18 decimals rather than failing, so a
/// dry run works without a fully populated table.
#[derive(Debug, Default)]
pub struct StaticTokenTable {
    decimals: RwLock<HashMap<TokenSymbol, u8>>,
    balances: RwLock<HashMap<(TokenSymbol, String), u64>>,
}

impl StaticTokenTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table preloaded with common stablecoin/ether decimals.
    #[must_use]
    pub fn with_defaults() -> Self {
        let table = Self::new();
        for (symbol, decimals) in [("USDC", 6), ("USDT", 6), ("WBTC", 8), ("WETH", 18), ("DAI", 18)]
        {
            table.set_decimals(&TokenSymbol::new(symbol), decimals);
        }
        table
    }

    /// Register the decimals for a token.
    pub fn set_decimals(&self, token: &TokenSymbol, decimals: u8) {
        self.decimals.write().insert(token.clone(), decimals);
    }

    /// Register a balance for an owner.
    pub fn set_balance(&self, token: &TokenSymbol, owner: &str, balance: u64) {
        self.balances
            .write()
            .insert((token.clone(), owner.to_string()), balance);
    }
}

#[async_trait]
impl TokenServicePort for StaticTokenTable {
    async fn decimals(&self, token: &TokenSymbol) -> Result<u8, TokenServiceError> {
        Ok(self
            .decimals
            .read()
            .get(token)
            .copied()
            .unwrap_or(DEFAULT_DECIMALS))
    }

    async fn balance_of(
        &self,
        token: &TokenSymbol,
        owner: &str,
    ) -> Result<u64, TokenServiceError> {
        Ok(self
            .balances
            .read()
            .get(&(token.clone(), owner.to_string()))
            .copied()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn defaults_cover_common_tokens() {
        let table = StaticTokenTable::with_defaults();
        assert_eq!(table.decimals(&TokenSymbol::new("USDC")).await.unwrap(), 6);
        assert_eq!(table.decimals(&TokenSymbol::new("WETH")).await.unwrap(), 18);
    }

    #[tokio::test]
    async fn unknown_token_falls_back_to_eighteen() {
        let table = StaticTokenTable::new();
        assert_eq!(
            table.decimals(&TokenSymbol::new("MYSTERY")).await.unwrap(),
            DEFAULT_DECIMALS
        );
    }

    #[tokio::test]
    async fn balances_default_to_zero() {
        let table = StaticTokenTable::new();
        let usdc = TokenSymbol::new("USDC");
        assert_eq!(table.balance_of(&usdc, "0xme").await.unwrap(), 0);

        table.set_balance(&usdc, "0xme", 42);
        assert_eq!(table.balance_of(&usdc, "0xme").await.unwrap(), 42);
        assert_eq!(table.balance_of(&usdc, "0xother").await.unwrap(), 0);
    }
}
