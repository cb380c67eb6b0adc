use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

pub const MINING_STATUS_COOLDOWN: Duration = Duration::from_secs(30);

/// Session-local rate limit keyed by an arbitrary string.
#[derive(Debug, Clone)]
pub struct Cooldown {
    period: Duration,
    last_called: HashMap<String, Instant>,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(MINING_STATUS_COOLDOWN)
    }
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_called: HashMap::new(),
        }
    }

    pub fn can_call(&self, key: &str) -> bool {
        self.remaining(key).is_zero()
    }

    pub fn mark_called(&mut self, key: &str) {
        self.last_called.insert(key.to_string(), Instant::now());
    }

    pub fn remaining(&self, key: &str) -> Duration {
        self.last_called
            .get(key)
            .map(|at| self.period.saturating_sub(at.elapsed()))
            .unwrap_or(Duration::ZERO)
    }
}
