use serde::Serialize;
use std::time::{Duration, Instant};

/// Consecutive failures after which the link is declared degraded.
pub const MAX_CONSECUTIVE_ERRORS: u8 = 5;

/// Default core-poll cadence, matching the device's recommended rate.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Two-state link health machine driven by consecutive-failure counting.
///
/// Every bus operation's outcome is reported here before its caller inspects
/// it. A single success resets the counter and restores HEALTHY; there is no
/// other recovery path and no backoff scheduling in this layer.
#[derive(Debug)]
pub struct LinkMonitor {
    connected: bool,
    consecutive_errors: u8,
    last_update: Option<Instant>,
    poll_interval: Duration,
    auto_poll: bool,
}

/// Read-only export of the link bookkeeping.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LinkState {
    pub connected: bool,
    pub consecutive_errors: u8,
    pub poll_interval_ms: u64,
    pub auto_poll: bool,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self {
            connected: false,
            consecutive_errors: 0,
            last_update: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            auto_poll: true,
        }
    }

    /// Record one successful bus operation. Idempotent when already healthy.
    pub fn record_success(&mut self) {
        self.consecutive_errors = 0;
        self.connected = true;
    }

    /// Record one failed bus operation.
    pub fn record_failure(&mut self) {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
            self.connected = false;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn consecutive_errors(&self) -> u8 {
        self.consecutive_errors
    }

    /// Mark the end of a core acquisition pass.
    pub fn touch(&mut self, now: Instant) {
        self.last_update = Some(now);
    }

    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    /// Whether a caller-driven tick should run a core pass now.
    pub fn poll_due(&self, now: Instant) -> bool {
        if !self.auto_poll {
            return false;
        }
        match self.last_update {
            Some(at) => now.duration_since(at) >= self.poll_interval,
            None => true,
        }
    }

    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn set_auto_poll(&mut self, enabled: bool) {
        self.auto_poll = enabled;
    }

    pub fn auto_poll(&self) -> bool {
        self.auto_poll
    }

    pub fn state(&self) -> LinkState {
        LinkState {
            connected: self.connected,
            consecutive_errors: self.consecutive_errors,
            poll_interval_ms: self.poll_interval.as_millis() as u64,
            auto_poll: self.auto_poll,
        }
    }
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new()
    }
}
