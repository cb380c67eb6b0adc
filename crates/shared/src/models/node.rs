use crate::models::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status the API reports for nodes that are currently mining.
pub const ACTIVE_STATUS: &str = "Active";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "_id", default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub node_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub wallet: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub node_status: String,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_claim_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_mining_start: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tx_hash: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub signature: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::object",
        skip_serializing_if = "Option::is_none"
    )]
    pub node_metrics: Option<NodeMetrics>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    #[serde(default, deserialize_with = "lenient::number")]
    pub cpu: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ram: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub disk: Option<f64>,
    /// Unitless speed tier used as the reward multiplier.
    #[serde(default, deserialize_with = "lenient::number")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::epoch_seconds")]
    pub last_seen: Option<i64>,
}

impl NodeMetrics {
    pub fn has_load_metric(&self) -> bool {
        self.cpu.is_some() || self.ram.is_some() || self.disk.is_some()
    }
}

impl Node {
    pub fn is_active(&self) -> bool {
        self.node_status == ACTIVE_STATUS
    }

    pub fn last_seen(&self) -> Option<i64> {
        self.node_metrics.as_ref().and_then(|m| m.last_seen)
    }

    pub fn speed(&self) -> Option<f64> {
        self.node_metrics.as_ref().and_then(|m| m.speed)
    }

    pub fn cpu(&self) -> Option<f64> {
        self.node_metrics.as_ref().and_then(|m| m.cpu)
    }

    pub fn ram(&self) -> Option<f64> {
        self.node_metrics.as_ref().and_then(|m| m.ram)
    }

    pub fn disk(&self) -> Option<f64> {
        self.node_metrics.as_ref().and_then(|m| m.disk)
    }

    /// `needle` must already be lowercase; an empty needle matches every node.
    pub fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.node_id.to_lowercase().contains(needle)
            || self.wallet.to_lowercase().contains(needle)
    }
}
