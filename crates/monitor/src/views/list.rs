use super::format::{fit, freshness_badge, or_na, short_wallet};
use crate::query::{run_query, summarize, NetworkSummary, PageView, QueryState};
use chrono::{DateTime, Utc};
use colored::Colorize;
use shared::models::Node;
use std::fmt;

/// Main node list: network summary followed by one page of nodes.
pub struct ListView {
    pub summary: NetworkSummary,
    pub page: PageView,
    pub query: QueryState,
}

impl ListView {
    pub fn build(nodes: &[Node], query: &QueryState, now: DateTime<Utc>) -> Self {
        Self {
            summary: summarize(nodes, now),
            page: run_query(nodes, query, now),
            query: query.clone(),
        }
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "{}", "Network overview".bold())?;
        writeln!(f, "  Total nodes: {}", s.total)?;
        writeln!(
            f,
            "  {} {} ({}%)  {} {} ({}%)  {} {} ({}%)  {} {}",
            "Fresh".green(),
            s.fresh,
            s.fresh_pct,
            "Delayed".yellow(),
            s.delayed,
            s.delayed_pct,
            "Stale".red(),
            s.stale,
            s.stale_pct,
            "N/A".dimmed(),
            s.unknown,
        )?;
        writeln!(
            f,
            "  Avg CPU: {}  Avg RAM: {}  Avg Disk: {}",
            or_na(s.avg_cpu.map(|v| format!("{v:.1}"))),
            or_na(s.avg_ram.map(|v| format!("{v:.0}"))),
            or_na(s.avg_disk.map(|v| format!("{v:.0}"))),
        )?;
        writeln!(f)?;

        if self.query.search().is_empty() {
            writeln!(f, "Sorted by {}", self.query.sort())?;
        } else {
            writeln!(
                f,
                "Search \"{}\" sorted by {}: {} matches",
                self.query.search(),
                self.query.sort(),
                self.page.total_matches
            )?;
        }

        if self.page.rows.is_empty() {
            return writeln!(f, "{}", "No nodes found".dimmed());
        }

        writeln!(
            f,
            "{:<32} {:<13} {:<8} {:>7} {:>7} {:>7} {:>6}  {}",
            "NODE", "WALLET", "STATUS", "CPU", "RAM", "DISK", "SPEED", "TYPE"
        )?;
        for row in &self.page.rows {
            let node = &row.node;
            writeln!(
                f,
                "{:<32} {:<13} {:<8} {:>7} {:>7} {:>7} {:>6}  {}",
                fit(&node.node_id, 32),
                short_wallet(&node.wallet),
                freshness_badge(row.freshness),
                or_na(node.cpu()),
                or_na(node.ram()),
                or_na(node.disk()),
                or_na(node.speed()),
                or_na(node.node_type.as_deref()),
            )?;
        }
        writeln!(
            f,
            "Page {} of {}",
            self.page.page,
            self.page.total_pages.max(1)
        )
    }
}
