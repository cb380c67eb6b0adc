use crate::freshness::{classify, Freshness};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::Node;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub total: usize,
    pub fresh: usize,
    pub delayed: usize,
    pub stale: usize,
    pub unknown: usize,
    pub fresh_pct: u32,
    pub delayed_pct: u32,
    pub stale_pct: u32,
    /// Nodes that reported at least one of cpu, ram or disk.
    pub reporting: usize,
    pub avg_cpu: Option<f64>,
    pub avg_ram: Option<f64>,
    pub avg_disk: Option<f64>,
}

pub fn summarize(nodes: &[Node], now: DateTime<Utc>) -> NetworkSummary {
    let mut summary = NetworkSummary {
        total: nodes.len(),
        ..Default::default()
    };
    let (mut cpu, mut ram, mut disk) = (0.0, 0.0, 0.0);

    for node in nodes {
        match classify(node.last_seen(), now) {
            Freshness::Fresh => summary.fresh += 1,
            Freshness::Delayed => summary.delayed += 1,
            Freshness::Stale => summary.stale += 1,
            Freshness::Unknown => summary.unknown += 1,
        }

        let Some(metrics) = node.node_metrics.as_ref().filter(|m| m.has_load_metric()) else {
            continue;
        };
        summary.reporting += 1;
        cpu += metrics.cpu.unwrap_or(0.0);
        ram += metrics.ram.unwrap_or(0.0);
        disk += metrics.disk.unwrap_or(0.0);
    }

    summary.fresh_pct = percent(summary.fresh, summary.total);
    summary.delayed_pct = percent(summary.delayed, summary.total);
    summary.stale_pct = percent(summary.stale, summary.total);

    if summary.reporting > 0 {
        let n = summary.reporting as f64;
        summary.avg_cpu = Some(cpu / n);
        summary.avg_ram = Some(ram / n);
        summary.avg_disk = Some(disk / n);
    }
    summary
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}
