use crate::models::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operational task statistics for a node. These describe work done, not rewards.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NodeTaskStats {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub task_count: Option<f64>,
    #[serde(default)]
    pub current_task_type: Option<String>,
    #[serde(default)]
    pub tts_power_status: Option<String>,
    /// Gigabytes.
    #[serde(default, deserialize_with = "lenient::number")]
    pub available_ram: Option<f64>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_task_assigned: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_task_completed: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_polled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub node_status: Option<String>,
}

impl NodeTaskStats {
    /// Typed view over the verbatim stats body. Unknown shapes yield an empty record.
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value() {
        let stats = NodeTaskStats::from_value(&json!({
            "success": true,
            "nodeId": "alpha.base.eth",
            "taskCount": 1520,
            "currentTaskType": "tts",
            "ttsPowerStatus": "idle",
            "availableRam": "7.5",
            "lastTaskAssigned": null,
            "lastTaskCompleted": "2025-03-01T10:00:00Z",
            "lastPolledAt": "2025-03-01T10:05:00Z",
            "nodeStatus": "Active"
        }));
        assert_eq!(stats.task_count, Some(1520.0));
        assert_eq!(stats.available_ram, Some(7.5));
        assert_eq!(stats.last_task_assigned, None);
        assert!(stats.last_task_completed.is_some());
    }

    #[test]
    fn test_from_unexpected_shape() {
        assert_eq!(NodeTaskStats::from_value(&json!([1, 2])), NodeTaskStats::default());
    }
}
