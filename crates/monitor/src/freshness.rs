//! Staleness tiers derived from a node's last metrics report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Reports younger than this are fresh.
pub const FRESH_THRESHOLD_SECS: i64 = 3_600;
/// Reports at least this old are stale.
pub const STALE_THRESHOLD_SECS: i64 = 86_400;

/// Ordered healthiest first: `Fresh < Delayed < Stale < Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Freshness {
    Fresh,
    Delayed,
    Stale,
    Unknown,
}

impl Freshness {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Freshness::Fresh => "Fresh",
            Freshness::Delayed => "Delayed",
            Freshness::Stale => "Stale",
            Freshness::Unknown => "N/A",
        }
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(last_seen: Option<i64>, now: DateTime<Utc>) -> Freshness {
    let Some(last_seen) = last_seen else {
        return Freshness::Unknown;
    };

    let age = now.timestamp().saturating_sub(last_seen);
    if age < FRESH_THRESHOLD_SECS {
        Freshness::Fresh
    } else if age < STALE_THRESHOLD_SECS {
        Freshness::Delayed
    } else {
        Freshness::Stale
    }
}
