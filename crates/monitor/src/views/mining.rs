use super::format::{format_tokens, or_na};
use crate::mining::MiningLookup;
use colored::Colorize;
use serde_json::Value;
use shared::models::mining::MiningStatusReport;
use std::fmt;

pub struct MiningView<'a> {
    pub wallet: &'a str,
    pub lookup: &'a MiningLookup,
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => or_na::<&str>(None),
        Some(other) => other.to_string(),
    }
}

fn yes_no(flag: Option<bool>) -> String {
    or_na(flag.map(|b| if b { "yes" } else { "no" }))
}

fn write_report(f: &mut fmt::Formatter<'_>, report: &MiningStatusReport) -> fmt::Result {
    let network = report.network.as_ref();
    writeln!(
        f,
        "  Network: {}  Block: {}  Gas: {} gwei",
        or_na(network.and_then(|n| n.network_name.as_deref())),
        value_text(network.and_then(|n| n.block_number.as_ref())),
        value_text(network.and_then(|n| n.gas_price_gwei.as_ref())),
    )?;

    let state = if report.is_mining_active() {
        "Mining active".green()
    } else {
        "Mining inactive".yellow()
    };
    writeln!(f, "  {state}")?;

    let info = report.mining_info();
    writeln!(
        f,
        "  Speed:          {} tokens/s",
        or_na(info.and_then(|i| i.speed_tokens_per_sec()).map(|v| format!("{v:.8}")))
    )?;
    writeln!(
        f,
        "  Time remaining: {}",
        or_na(info.and_then(|i| i.time_remaining_hours).map(|h| format!("{h:.2}h")))
    )?;
    writeln!(
        f,
        "  Progress:       {}",
        or_na(info.and_then(|i| i.percent_complete()).map(|p| format!("{p:.2}%")))
    )?;
    writeln!(
        f,
        "  Mined:          {}",
        or_na(info.and_then(|i| i.mined_tokens_formatted).map(format_tokens))
    )?;

    let wallet = report.wallet.as_ref();
    writeln!(
        f,
        "  Wallet balance: {}",
        value_text(wallet.and_then(|w| w.current_balance.as_ref()))
    )?;
    writeln!(
        f,
        "  Min balance:    {}",
        yes_no(wallet.and_then(|w| w.has_min_balance))
    )?;
    writeln!(
        f,
        "  Can claim:      {}",
        if report.can_claim() { "yes" } else { "no" }
    )
}

impl fmt::Display for MiningView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", "Mining status for".bold(), self.wallet)?;
        match self.lookup {
            MiningLookup::Found(report) => write_report(f, report),
            MiningLookup::NoData => writeln!(f, "  {}", "No mining data found".yellow()),
            MiningLookup::RequestFailed => {
                writeln!(f, "  {}", "Mining status request failed".red())
            }
            MiningLookup::CoolingDown { remaining } => writeln!(
                f,
                "  {}",
                format!(
                    "Please wait {}s before checking again",
                    remaining.as_secs().max(1)
                )
                .yellow()
            ),
            MiningLookup::InvalidWallet(e) => writeln!(f, "  {}", e.to_string().red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::wallet::WalletAddressError;
    use std::time::Duration;

    const WALLET: &str = "0x1234567890abcdef1234567890abcdef12345678";

    fn render(lookup: MiningLookup) -> String {
        colored::control::set_override(false);
        MiningView {
            wallet: WALLET,
            lookup: &lookup,
        }
        .to_string()
    }

    #[test]
    fn test_render_report() {
        let report: MiningStatusReport = serde_json::from_value(json!({
            "success": true,
            "network": { "networkName": "base", "blockNumber": 123456, "gasPriceGwei": "0.01" },
            "contract": { "miningInfo": {
                "isActive": true,
                "speedPerSec": "500000000000000",
                "timeRemainingHours": 12.5,
                "percentCompleteNumber": 4750,
                "minedTokensFormatted": "3.25"
            }},
            "wallet": { "currentBalance": "0.5", "hasMinBalance": true }
        }))
        .unwrap();

        let out = render(MiningLookup::Found(Box::new(report)));
        assert!(out.contains("Network: base  Block: 123456  Gas: 0.01 gwei"));
        assert!(out.contains("Mining active"));
        assert!(out.contains("Speed:          0.00050000 tokens/s"));
        assert!(out.contains("Progress:       47.50%"));
        assert!(out.contains("Mined:          3.2500"));
        assert!(out.contains("Can claim:      yes"));
    }

    #[test]
    fn test_render_outcomes() {
        assert!(render(MiningLookup::NoData).contains("No mining data found"));
        assert!(render(MiningLookup::CoolingDown {
            remaining: Duration::from_secs(12)
        })
        .contains("wait 12s"));
        assert!(render(MiningLookup::InvalidWallet(WalletAddressError::InvalidFormat))
            .contains("Invalid wallet address format"));
    }

    #[test]
    fn test_render_sparse_report() {
        let out = render(MiningLookup::Found(Box::default()));
        assert!(out.contains("Network: N/A"));
        assert!(out.contains("Mining inactive"));
        assert!(out.contains("Min balance:    N/A"));
    }
}
