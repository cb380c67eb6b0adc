use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Time between background refreshes of the node list.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RefreshState {
    Idle,
    FetchingInitial,
    FetchingBackground,
    Error,
}

impl RefreshState {
    pub fn is_fetching(self) -> bool {
        matches!(
            self,
            RefreshState::FetchingInitial | RefreshState::FetchingBackground
        )
    }
}

impl fmt::Display for RefreshState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RefreshState::Idle => "idle",
            RefreshState::FetchingInitial => "initial loading",
            RefreshState::FetchingBackground => "updating in background",
            RefreshState::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Initial,
    Background,
}

/// Snapshot published to views after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshStatus {
    pub state: RefreshState,
    pub remaining_secs: u64,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub fetches_started: u64,
}

/// Countdown and in-flight bookkeeping of the polling loop, free of any I/O.
///
/// A method returning `Some(kind)` means the caller must issue exactly one fetch
/// and report its outcome through [`RefreshMachine::complete`]. While a fetch is
/// outstanding every request for another one is refused.
#[derive(Debug, Clone)]
pub struct RefreshMachine {
    interval_secs: u64,
    state: RefreshState,
    remaining_secs: u64,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
    fetches_started: u64,
}

impl RefreshMachine {
    pub fn new(interval: Duration) -> Self {
        let interval_secs = interval.as_secs().max(1);
        Self {
            interval_secs,
            state: RefreshState::Idle,
            remaining_secs: interval_secs,
            last_updated: None,
            last_error: None,
            fetches_started: 0,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn in_flight(&self) -> bool {
        self.state.is_fetching()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Cache-first: a populated cache skips the initial fetch entirely.
    pub fn mount(&mut self, cache_has_data: bool) -> Option<FetchKind> {
        if self.in_flight() {
            return None;
        }
        if cache_has_data {
            self.state = RefreshState::Idle;
            return None;
        }
        self.begin(FetchKind::Initial)
    }

    /// One second elapsed. Ticks arriving while a fetch is outstanding are no-ops.
    pub fn tick(&mut self) -> Option<FetchKind> {
        if self.in_flight() {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.begin(FetchKind::Background)
    }

    pub fn force_refresh(&mut self) -> Option<FetchKind> {
        if self.in_flight() {
            return None;
        }
        self.begin(FetchKind::Background)
    }

    /// Records the outcome of the outstanding fetch. The countdown restarts
    /// either way; a failure leaves the timer running so the next tick retries.
    pub fn complete(&mut self, outcome: Result<(), String>, now: DateTime<Utc>) {
        match outcome {
            Ok(()) => {
                self.state = RefreshState::Idle;
                self.last_updated = Some(now);
                self.last_error = None;
            }
            Err(message) => {
                self.state = RefreshState::Error;
                self.last_error = Some(message);
            }
        }
        self.remaining_secs = self.interval_secs;
    }

    pub fn status(&self) -> RefreshStatus {
        RefreshStatus {
            state: self.state,
            remaining_secs: self.remaining_secs,
            last_updated: self.last_updated,
            last_error: self.last_error.clone(),
            fetches_started: self.fetches_started,
        }
    }

    fn begin(&mut self, kind: FetchKind) -> Option<FetchKind> {
        self.state = match kind {
            FetchKind::Initial => RefreshState::FetchingInitial,
            FetchKind::Background => RefreshState::FetchingBackground,
        };
        self.fetches_started += 1;
        Some(kind)
    }
}
