use super::format::{
    format_date, format_epoch, format_tokens, freshness_badge, mining_time, or_na, NOT_AVAILABLE,
};
use crate::api::NetrumApi;
use crate::error::ApiError;
use crate::freshness::{classify, Freshness};
use crate::rewards::{estimate_for_node, RewardEstimate, RewardFormula};
use crate::store::NodeCache;
use chrono::{DateTime, Utc};
use colored::Colorize;
use log::{debug, warn};
use shared::models::task::NodeTaskStats;
use shared::models::Node;
use shared::web3::{BalanceLookup, TokenBalance};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    Cache,
    Api,
}

#[derive(Debug)]
pub struct NodeDetail {
    pub node: Node,
    pub source: DetailSource,
    pub freshness: Freshness,
    pub dashboard_reward: RewardEstimate,
    pub detail_reward: RewardEstimate,
    /// Task activity is its own panel; a failure there does not hide the node.
    pub task_stats: Result<NodeTaskStats, String>,
    /// Claimed balance from the external RPC, `None` when unavailable.
    pub balance: Option<TokenBalance>,
}

/// Loads a node from the session cache, falling back to the per-node endpoint,
/// then gathers task activity and the optional wallet balance concurrently.
pub async fn load_detail(
    id: &str,
    cache: &NodeCache,
    api: &NetrumApi,
    balances: Option<&dyn BalanceLookup>,
    now: DateTime<Utc>,
) -> Result<NodeDetail, ApiError> {
    let (node, source) = match cache.find(id).await {
        Some(node) => (node, DetailSource::Cache),
        None => {
            debug!("Node {id} not cached, fetching from API");
            (api.fetch_node(id).await?, DetailSource::Api)
        }
    };

    let balance = async {
        let lookup = balances?;
        match lookup.token_balance(&node.wallet).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!("Balance lookup for {} failed: {e:#}", node.wallet);
                None
            }
        }
    };
    let (task_stats, balance) = tokio::join!(api.fetch_task_stats(id), balance);

    Ok(NodeDetail {
        freshness: classify(node.last_seen(), now),
        dashboard_reward: estimate_for_node(&node, now, RewardFormula::Base),
        detail_reward: estimate_for_node(&node, now, RewardFormula::Normalized),
        task_stats: task_stats
            .map(|value| NodeTaskStats::from_value(&value))
            .map_err(|e| e.to_string()),
        balance,
        node,
        source,
    })
}

impl fmt::Display for NodeDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = &self.node;
        writeln!(f, "{}", node.node_id.bold())?;
        writeln!(f, "  Node ID: {}", node.id)?;
        writeln!(f, "  Wallet:  {}", node.wallet)?;
        writeln!(
            f,
            "  Status:  {}  Metrics: {}  Type: {}",
            node.node_status,
            freshness_badge(self.freshness),
            or_na(node.node_type.as_deref())
        )?;
        writeln!(
            f,
            "  CPU: {}  RAM: {}  Disk: {}  Speed: {}",
            or_na(node.cpu()),
            or_na(node.ram()),
            or_na(node.disk()),
            or_na(node.speed())
        )?;
        writeln!(f)?;
        writeln!(f, "  Created:       {}", format_date(node.created_at))?;
        writeln!(f, "  Last claim:    {}", format_date(node.last_claim_time))?;
        writeln!(f, "  Mining start:  {}", format_date(node.last_mining_start))?;
        writeln!(f, "  Last metrics:  {}", format_epoch(node.last_seen()))?;
        if let Some(tx_hash) = &node.tx_hash {
            writeln!(f, "  Tx hash:       {tx_hash}")?;
        }
        writeln!(f)?;

        writeln!(f, "{}", "Rewards".bold())?;
        let symbol = self
            .balance
            .as_ref()
            .map_or("NPT", |b| b.symbol.as_str());
        writeln!(
            f,
            "  Claimed balance (external RPC): {}",
            self.balance.as_ref().map_or_else(
                || NOT_AVAILABLE.to_string(),
                |b| format!("{} {}", format_tokens(b.balance), b.symbol)
            )
        )?;
        writeln!(
            f,
            "  Mining time: {}",
            mining_time(&self.dashboard_reward)
        )?;
        for estimate in [&self.dashboard_reward, &self.detail_reward] {
            writeln!(
                f,
                "  {:<10} total {} {symbol}, {} {symbol}/day",
                estimate.formula.label(),
                format_tokens(estimate.total_reward),
                format_tokens(estimate.reward_per_day),
            )?;
        }
        writeln!(f, "  {}", RewardEstimate::APPROXIMATION_NOTICE.dimmed())?;
        writeln!(f)?;

        writeln!(f, "{}", "Task activity".bold())?;
        match &self.task_stats {
            Ok(stats) => {
                writeln!(f, "  Tasks completed:   {}", or_na(stats.task_count))?;
                writeln!(f, "  Node status:       {}", or_na(stats.node_status.as_deref()))?;
                writeln!(
                    f,
                    "  Current activity:  {}",
                    or_na(stats.tts_power_status.as_deref())
                )?;
                writeln!(
                    f,
                    "  Current task type: {}",
                    or_na(stats.current_task_type.as_deref())
                )?;
                writeln!(
                    f,
                    "  Available RAM:     {}",
                    or_na(stats.available_ram.map(|gb| format!("{gb} GB")))
                )?;
                writeln!(f, "  Last assigned:     {}", format_date(stats.last_task_assigned))?;
                writeln!(f, "  Last completed:    {}", format_date(stats.last_task_completed))?;
                writeln!(f, "  Last polled:       {}", format_date(stats.last_polled_at))
            }
            Err(e) => writeln!(f, "  {}", e.red()),
        }
    }
}
