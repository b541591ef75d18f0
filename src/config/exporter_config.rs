//! Exporter runtime settings (poll cadence, listen address, oneshot mode).

use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:9375";
pub const DEFAULT_INTERVAL_MINUTES: i64 = 10;

/// Poll cadence in whole minutes, never below one minute.
///
/// The Robot API enforces an hourly request budget per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval {
    minutes: u64,
}

impl PollInterval {
    pub const MIN_MINUTES: u64 = 1;

    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            minutes: u64::try_from(minutes)
                .unwrap_or(0)
                .max(Self::MIN_MINUTES),
        }
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.minutes.saturating_mul(60))
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_INTERVAL_MINUTES)
    }
}

#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub oneshot: bool,
    pub log_updates: bool,
    pub interval: PollInterval,
    /// `host:port` to bind; host names are resolved at bind time
    pub listen: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            oneshot: false,
            log_updates: false,
            interval: PollInterval::default(),
            listen: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}
