pub mod summary;

use crate::freshness::{classify, Freshness};
use crate::rewards::{estimate_for_node, RewardEstimate, RewardFormula};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::Node;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub use summary::{summarize, NetworkSummary};

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortKey {
    #[default]
    Freshness,
    Cpu,
    Ram,
    Disk,
    Reward,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Freshness => "freshness",
            SortKey::Cpu => "cpu",
            SortKey::Ram => "ram",
            SortKey::Disk => "disk",
            SortKey::Reward => "reward",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "freshness" | "status" => Ok(SortKey::Freshness),
            "cpu" => Ok(SortKey::Cpu),
            "ram" => Ok(SortKey::Ram),
            "disk" => Ok(SortKey::Disk),
            "reward" | "rewards" => Ok(SortKey::Reward),
            other => Err(format!(
                "Unknown sort key '{other}', expected one of freshness, cpu, ram, disk, reward"
            )),
        }
    }
}

/// View state of a list. Changing the search text or the sort key returns to
/// the first page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryState {
    search: String,
    sort: SortKey,
    page: usize,
    active_only: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortKey::default(),
            page: 1,
            active_only: false,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewards view state: only nodes reporting `Active`, highest reward first.
    pub fn active_rewards() -> Self {
        Self {
            sort: SortKey::Reward,
            active_only: true,
            ..Self::default()
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn active_only(&self) -> bool {
        self.active_only
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_active_only(&mut self, active_only: bool) {
        self.active_only = active_only;
        self.page = 1;
    }

    /// Page numbers start at 1; the upper bound is applied by [`run_query`].
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeRow {
    pub node: Node,
    pub freshness: Freshness,
    pub reward: RewardEstimate,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub rows: Vec<NodeRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

impl PageView {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Filter, sort, paginate. Rewards are estimated with the dashboard formula.
pub fn run_query(nodes: &[Node], query: &QueryState, now: DateTime<Utc>) -> PageView {
    let needle = query.search.trim().to_lowercase();

    let mut matches: Vec<NodeRow> = nodes
        .iter()
        .filter(|node| !query.active_only || node.is_active())
        .filter(|node| node.matches_search(&needle))
        .map(|node| NodeRow {
            freshness: classify(node.last_seen(), now),
            reward: estimate_for_node(node, now, RewardFormula::Base),
            node: node.clone(),
        })
        .collect();

    // Vec::sort_by is stable, ties keep upstream order.
    match query.sort {
        SortKey::Freshness => matches.sort_by_key(|row| row.freshness.rank()),
        SortKey::Cpu => matches.sort_by(|a, b| descending(a.node.cpu(), b.node.cpu())),
        SortKey::Ram => matches.sort_by(|a, b| descending(a.node.ram(), b.node.ram())),
        SortKey::Disk => matches.sort_by(|a, b| descending(a.node.disk(), b.node.disk())),
        SortKey::Reward => matches.sort_by(|a, b| {
            descending(Some(a.reward.total_reward), Some(b.reward.total_reward))
        }),
    }

    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(PAGE_SIZE);
    let page = query.page.clamp(1, total_pages.max(1));

    let rows = matches
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    PageView {
        rows,
        page,
        total_pages,
        total_matches,
    }
}

/// Missing values order as zero.
fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(0.0).total_cmp(&a.unwrap_or(0.0))
}
