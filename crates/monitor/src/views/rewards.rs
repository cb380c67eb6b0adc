use super::format::{fit, format_tokens, freshness_badge, mining_time, or_na, short_wallet};
use crate::query::{run_query, PageView, QueryState};
use crate::rewards::RewardEstimate;
use chrono::{DateTime, Utc};
use colored::Colorize;
use shared::models::Node;
use std::fmt;

/// Estimated rewards for nodes currently reporting `Active`.
pub struct RewardsView {
    pub page: PageView,
}

impl RewardsView {
    /// The query is forced to active nodes only.
    pub fn build(nodes: &[Node], query: &QueryState, now: DateTime<Utc>) -> Self {
        let mut query = query.clone();
        if !query.active_only() {
            let page = query.page();
            query.set_active_only(true);
            query.set_page(page);
        }
        Self {
            page: run_query(nodes, &query, now),
        }
    }

    pub fn total_reward(&self) -> f64 {
        self.page.rows.iter().map(|r| r.reward.total_reward).sum()
    }
}

impl fmt::Display for RewardsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} active nodes)",
            "Estimated rewards".bold(),
            self.page.total_matches
        )?;
        if self.page.rows.is_empty() {
            return writeln!(f, "{}", "No active nodes".dimmed());
        }

        writeln!(
            f,
            "{:<32} {:<13} {:<8} {:>10} {:>12} {:>10} {:>6}",
            "NODE", "WALLET", "STATUS", "MINING", "REWARD", "PER DAY", "SPEED"
        )?;
        for row in &self.page.rows {
            let reward = &row.reward;
            writeln!(
                f,
                "{:<32} {:<13} {:<8} {:>10} {:>12} {:>10} {:>6}",
                fit(&row.node.node_id, 32),
                short_wallet(&row.node.wallet),
                freshness_badge(row.freshness),
                mining_time(reward),
                format_tokens(reward.total_reward),
                format_tokens(reward.reward_per_day),
                or_na(row.node.speed()),
            )?;
        }
        writeln!(
            f,
            "Page {} of {}",
            self.page.page,
            self.page.total_pages.max(1)
        )?;
        writeln!(f, "{}", RewardEstimate::APPROXIMATION_NOTICE.dimmed())
    }
}
