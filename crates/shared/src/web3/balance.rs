use crate::models::wallet::validate_wallet_address;
use crate::web3::token::Erc20Token;
use alloy::primitives::utils::format_units;
use alloy::primitives::{hex, Address, U256};
use alloy::providers::RootProvider;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

/// Public Base mainnet RPC.
pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";

/// Network token contract on Base.
pub const DEFAULT_TOKEN_ADDRESS: Address =
    Address::new(hex!("0xB8c2CE84F831175136cebBFD48CE4BAb9c7a6424"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenBalance {
    pub symbol: String,
    /// `raw_balance / 10^decimals`.
    pub balance: f64,
    pub raw_balance: String,
    pub decimals: u8,
}

impl TokenBalance {
    pub fn from_raw(raw_balance: U256, decimals: u8, symbol: String) -> Result<Self> {
        let formatted = format_units(raw_balance, decimals)
            .with_context(|| format!("cannot scale balance by {decimals} decimals"))?;
        let balance = formatted
            .parse::<f64>()
            .context("scaled balance is not a number")?;
        Ok(Self {
            symbol,
            balance,
            raw_balance: raw_balance.to_string(),
            decimals,
        })
    }
}

/// Token balance lookup for a wallet. Optional enhancement: callers treat any
/// error as "balance unknown".
#[async_trait]
pub trait BalanceLookup: Send + Sync {
    async fn token_balance(&self, wallet: &str) -> Result<TokenBalance>;
}

pub struct RpcBalanceLookup {
    token: Erc20Token<RootProvider>,
}

impl RpcBalanceLookup {
    pub fn new(rpc_url: Url, token_address: Address) -> Result<Self> {
        let provider = RootProvider::new_http(rpc_url);
        let token = Erc20Token::new(token_address, provider).context("failed to load token ABI")?;
        Ok(Self { token })
    }
}

#[async_trait]
impl BalanceLookup for RpcBalanceLookup {
    async fn token_balance(&self, wallet: &str) -> Result<TokenBalance> {
        let account = validate_wallet_address(wallet)?;
        debug!("Fetching token balance for {account}");

        let (raw_balance, decimals, symbol) = tokio::try_join!(
            self.token.balance_of(account),
            self.token.decimals(),
            self.token.symbol(),
        )?;

        TokenBalance::from_raw(raw_balance, decimals, symbol)
    }
}

pub struct MockBalanceLookup {
    balances: Arc<Mutex<HashMap<String, TokenBalance>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockBalanceLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBalanceLookup {
    pub fn new() -> Self {
        Self {
            balances: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add_balance(&self, wallet: &str, balance: TokenBalance) {
        let mut balances = self.balances.lock().await;
        balances.insert(wallet.to_lowercase(), balance);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl BalanceLookup for MockBalanceLookup {
    async fn token_balance(&self, wallet: &str) -> Result<TokenBalance> {
        self.calls.lock().await.push(wallet.to_string());
        let balances = self.balances.lock().await;
        balances
            .get(&wallet.to_lowercase())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no balance for wallet {}", wallet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_scales_by_decimals() {
        let raw = U256::from(1_234_500_000_000_000_000_u128);
        let balance = TokenBalance::from_raw(raw, 18, "NPT".to_string()).unwrap();
        assert_eq!(balance.balance, 1.2345);
        assert_eq!(balance.raw_balance, "1234500000000000000");
        assert_eq!(balance.decimals, 18);

        let zero_decimals = TokenBalance::from_raw(U256::from(42), 0, "X".to_string()).unwrap();
        assert_eq!(zero_decimals.balance, 42.0);
    }

    #[tokio::test]
    async fn test_mock_balance_lookup() {
        let lookup = MockBalanceLookup::new();
        let balance = TokenBalance::from_raw(U256::from(5), 0, "NPT".to_string()).unwrap();
        lookup.add_balance("0xABC", balance.clone()).await;

        assert_eq!(lookup.token_balance("0xabc").await.unwrap(), balance);
        assert!(lookup.token_balance("0xdef").await.is_err());
        assert_eq!(lookup.calls().await, vec!["0xabc", "0xdef"]);
    }

    #[tokio::test]
    async fn test_rpc_lookup_rejects_invalid_wallet_before_calling() {
        let lookup =
            RpcBalanceLookup::new("http://127.0.0.1:9".parse().unwrap(), DEFAULT_TOKEN_ADDRESS)
                .unwrap();
        let err = lookup.token_balance("not-a-wallet").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid wallet address format");
    }
}
