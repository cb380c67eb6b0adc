//! Approximate mining reward estimation.
//!
//! The network does not expose exact mining uptime. Accrual is measured from the
//! last known checkpoint (last claim, else last mining start), and any restart,
//! binary update, network update or claim moves that checkpoint upstream without
//! the dashboard being able to tell which one happened. Every figure produced
//! here is an estimate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::models::Node;

/// Tokens per second accrued by a node at speed factor 1.
pub const BASE_RATE_PER_SEC: f64 = 0.00004293;
/// Speed divisor applied by the normalized formula.
pub const SPEED_DENOMINATOR: f64 = 5.0;
/// Final divisor applied by the normalized formula.
pub const REWARD_NORMALIZER: f64 = 10.0;
pub const SECONDS_PER_DAY: u64 = 86_400;

/// The two reward-rate policies in use. They are independent knobs and are not
/// expected to agree for the same node; callers must pick one and say which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RewardFormula {
    /// `BASE_RATE_PER_SEC * speed`, used on the list and rewards views.
    Base,
    /// `BASE_RATE_PER_SEC * (speed / SPEED_DENOMINATOR) / REWARD_NORMALIZER`,
    /// used by the per-node reward block.
    Normalized,
}

impl RewardFormula {
    pub fn rate_per_second(self, speed: Option<f64>) -> f64 {
        let speed = speed.filter(|s| s.is_finite()).unwrap_or(0.0).max(0.0);
        match self {
            RewardFormula::Base => BASE_RATE_PER_SEC * speed,
            RewardFormula::Normalized => {
                BASE_RATE_PER_SEC * (speed / SPEED_DENOMINATOR) / REWARD_NORMALIZER
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RewardFormula::Base => "base",
            RewardFormula::Normalized => "normalized",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Checkpoint {
    LastClaim(DateTime<Utc>),
    MiningStart(DateTime<Utc>),
}

impl Checkpoint {
    pub fn resolve(
        last_claim: Option<DateTime<Utc>>,
        last_mining_start: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        last_claim
            .map(Checkpoint::LastClaim)
            .or_else(|| last_mining_start.map(Checkpoint::MiningStart))
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Checkpoint::LastClaim(ts) | Checkpoint::MiningStart(ts) => *ts,
        }
    }

    /// Seconds since the checkpoint, clamped to zero for checkpoints in the future.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        now.signed_duration_since(self.at()).num_seconds().max(0) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardEstimate {
    /// `None` when the node has neither a claim nor a mining-start time. The
    /// numbers below are then zero and must be shown as unknown.
    pub checkpoint: Option<Checkpoint>,
    pub mining_seconds: u64,
    pub rate_per_second: f64,
    pub total_reward: f64,
    pub reward_per_day: f64,
    pub formula: RewardFormula,
}

impl RewardEstimate {
    pub const APPROXIMATION_NOTICE: &'static str = "Approximate value. Calculated from the last claim, node restart, binary update, or network update. Actual mined amount may differ.";

    pub fn is_known(&self) -> bool {
        self.checkpoint.is_some()
    }
}

pub fn estimate(
    last_claim: Option<DateTime<Utc>>,
    last_mining_start: Option<DateTime<Utc>>,
    speed: Option<f64>,
    now: DateTime<Utc>,
    formula: RewardFormula,
) -> RewardEstimate {
    let checkpoint = Checkpoint::resolve(last_claim, last_mining_start);
    let mining_seconds = checkpoint.map_or(0, |c| c.elapsed_secs(now));
    let rate_per_second = formula.rate_per_second(speed);

    RewardEstimate {
        checkpoint,
        mining_seconds,
        rate_per_second,
        total_reward: rate_per_second * mining_seconds as f64,
        reward_per_day: rate_per_second * SECONDS_PER_DAY as f64,
        formula,
    }
}

pub fn estimate_for_node(node: &Node, now: DateTime<Utc>, formula: RewardFormula) -> RewardEstimate {
    estimate(
        node.last_claim_time,
        node.last_mining_start,
        node.speed(),
        now,
        formula,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000, 0).unwrap()
    }

    fn ago(secs: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::seconds(secs))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_one_day_at_speed_five() {
        let est = estimate(ago(86_400), None, Some(5.0), now(), RewardFormula::Base);
        assert_eq!(est.mining_seconds, 86_400);
        assert_close(est.total_reward, 18.54576);
        assert_close(est.reward_per_day, 18.54576);
        // Per unit of speed the daily accrual is BASE_RATE_PER_SEC * 86400.
        assert_close(est.reward_per_day / 5.0, 3.709152);
    }

    #[test]
    fn test_normalized_formula() {
        let est = estimate(ago(86_400), None, Some(5.0), now(), RewardFormula::Normalized);
        assert_close(est.total_reward, 0.3709152);
        assert_close(est.rate_per_second, BASE_RATE_PER_SEC / 10.0);
    }

    #[test]
    fn test_last_claim_takes_precedence() {
        let est = estimate(ago(100), ago(5_000), Some(1.0), now(), RewardFormula::Base);
        assert_eq!(est.mining_seconds, 100);
        assert!(matches!(est.checkpoint, Some(Checkpoint::LastClaim(_))));

        let est = estimate(None, ago(5_000), Some(1.0), now(), RewardFormula::Base);
        assert_eq!(est.mining_seconds, 5_000);
        assert!(matches!(est.checkpoint, Some(Checkpoint::MiningStart(_))));
    }

    #[test]
    fn test_future_checkpoint_clamps_to_zero() {
        for skew in [1, 60, 86_400 * 3] {
            let est = estimate(ago(-skew), None, Some(5.0), now(), RewardFormula::Base);
            assert_eq!(est.mining_seconds, 0);
            assert_eq!(est.total_reward, 0.0);
        }
    }

    #[test]
    fn test_no_checkpoint_is_explicitly_unknown() {
        let est = estimate(None, None, Some(5.0), now(), RewardFormula::Base);
        assert!(!est.is_known());
        assert_eq!(est.mining_seconds, 0);
        assert_eq!(est.total_reward, 0.0);
    }

    #[test]
    fn test_missing_speed_yields_zero_reward() {
        for formula in [RewardFormula::Base, RewardFormula::Normalized] {
            let est = estimate(ago(3_600), None, None, now(), formula);
            assert!(est.is_known());
            assert_eq!(est.mining_seconds, 3_600);
            assert_eq!(est.total_reward, 0.0);
            assert_eq!(est.reward_per_day, 0.0);
        }
    }

    #[test]
    fn test_reward_is_linear_in_duration() {
        for formula in [RewardFormula::Base, RewardFormula::Normalized] {
            for speed in [0.5, 1.0, 5.0, 12.0] {
                let one = estimate(ago(7_777), None, Some(speed), now(), formula);
                let two = estimate(ago(2 * 7_777), None, Some(speed), now(), formula);
                assert_close(two.total_reward, 2.0 * one.total_reward);
            }
        }
    }

    #[test]
    fn test_formulas_are_each_proportional_to_speed() {
        // Same duration in, proportional reward out, per formula. The two formulas
        // are not compared against each other.
        for formula in [RewardFormula::Base, RewardFormula::Normalized] {
            let slow = estimate(ago(40_000), None, Some(2.0), now(), formula);
            let fast = estimate(ago(40_000), None, Some(6.0), now(), formula);
            assert_close(fast.total_reward, 3.0 * slow.total_reward);
        }
    }

    #[test]
    fn test_estimate_for_node_reads_metrics() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "_id": "n1",
            "lastMiningStart": (now() - Duration::seconds(600)).to_rfc3339(),
            "nodeMetrics": { "speed": 2 }
        }))
        .unwrap();
        let est = estimate_for_node(&node, now(), RewardFormula::Base);
        assert_eq!(est.mining_seconds, 600);
        assert_close(est.total_reward, BASE_RATE_PER_SEC * 2.0 * 600.0);
    }
}
