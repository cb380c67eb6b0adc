//! Display helpers shared by the terminal views. Missing values render as "N/A".

use crate::freshness::Freshness;
use crate::rewards::RewardEstimate;
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use std::fmt::Display;

pub const NOT_AVAILABLE: &str = "N/A";

pub fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Whole hours and minutes, e.g. `26h 5m`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

/// Elapsed time since the reward checkpoint, "N/A" without one.
pub fn mining_time(reward: &RewardEstimate) -> String {
    if reward.is_known() {
        format_duration(reward.mining_seconds)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

pub fn format_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |ts| ts.format("%b %d, %Y, %H:%M").to_string(),
    )
}

/// Epoch seconds; zero and absent values are both unknown.
pub fn format_epoch(secs: Option<i64>) -> String {
    format_date(
        secs.filter(|s| *s > 0)
            .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0)),
    )
}

pub fn format_tokens(amount: f64) -> String {
    format!("{amount:.4}")
}

/// `0x1234…abcd`. Values too short to abbreviate are returned unchanged.
pub fn short_wallet(wallet: &str) -> String {
    let chars: Vec<char> = wallet.chars().collect();
    if chars.len() <= 10 {
        return wallet.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

pub fn freshness_badge(freshness: Freshness) -> ColoredString {
    let label = freshness.label();
    match freshness {
        Freshness::Fresh => label.green(),
        Freshness::Delayed => label.yellow(),
        Freshness::Stale => label.red(),
        Freshness::Unknown => label.dimmed(),
    }
}

/// Truncates to `width` characters, marking the cut with an ellipsis.
pub fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0h 0m");
        assert_eq!(format_duration(59), "0h 0m");
        assert_eq!(format_duration(3_660), "1h 1m");
        assert_eq!(format_duration(86_400 + 300), "24h 5m");
    }

    #[test]
    fn test_missing_values_render_na() {
        assert_eq!(or_na::<f64>(None), "N/A");
        assert_eq!(or_na(Some(12.5)), "12.5");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_epoch(Some(0)), "N/A");
        assert_eq!(format_epoch(None), "N/A");
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_date(Some(ts)), "Mar 07, 2025, 09:05");
        assert_eq!(format_epoch(Some(ts.timestamp())), "Mar 07, 2025, 09:05");
    }

    #[test]
    fn test_short_wallet() {
        assert_eq!(
            short_wallet("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234…5678"
        );
        assert_eq!(short_wallet("0xabc"), "0xabc");
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("alpha", 10), "alpha");
        assert_eq!(fit("netrum.lite.alpha.base.eth", 10), "netrum.li…");
    }
}
