use crate::models::lenient;
use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Response of the per-wallet mining contract debug endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MiningStatusReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub network: Option<NetworkInfo>,
    #[serde(default)]
    pub contract: Option<ContractInfo>,
    #[serde(default)]
    pub wallet: Option<WalletInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    #[serde(default)]
    pub network_name: Option<String>,
    #[serde(default)]
    pub block_number: Option<Value>,
    #[serde(default)]
    pub gas_price_gwei: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub mining_info: Option<MiningInfo>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MiningInfo {
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Wei per second, as a decimal string.
    #[serde(default)]
    pub speed_per_sec: Option<Value>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub time_remaining_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub percent_complete_number: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub mined_tokens_formatted: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    #[serde(default)]
    pub current_balance: Option<Value>,
    #[serde(default)]
    pub eth_balance: Option<Value>,
    #[serde(default)]
    pub has_min_balance: Option<bool>,
}

impl MiningInfo {
    /// Mining speed in whole tokens per second, converted from the wei amount.
    pub fn speed_tokens_per_sec(&self) -> Option<f64> {
        let raw = match self.speed_per_sec.as_ref()? {
            Value::String(s) => U256::from_str(s.trim()).ok()?,
            Value::Number(n) => U256::from(n.as_u64()?),
            _ => return None,
        };
        let formatted = format_units(raw, 18u8).ok()?;
        formatted.parse::<f64>().ok().filter(|v| *v > 0.0)
    }

    /// Completion in percent. The endpoint reports hundredths of a percent.
    pub fn percent_complete(&self) -> Option<f64> {
        self.percent_complete_number.map(|v| v / 100.0)
    }
}

impl MiningStatusReport {
    pub fn mining_info(&self) -> Option<&MiningInfo> {
        self.contract.as_ref().and_then(|c| c.mining_info.as_ref())
    }

    pub fn is_mining_active(&self) -> bool {
        self.mining_info()
            .and_then(|info| info.is_active)
            .unwrap_or(false)
    }

    pub fn can_claim(&self) -> bool {
        self.wallet
            .as_ref()
            .and_then(|w| w.has_min_balance)
            .unwrap_or(false)
    }
}
