//! Sliding-window circuit breaker
//!
//! Counts blocked tool calls inside a time window and, once the count
//! reaches the configured maximum, either suspends further calls or keeps
//! evaluating while the host warns. State is a single timestamp sequence;
//! there is no explicit reset.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Deserialize;

/// What to do when the window fills up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BreakerAction {
    /// Block every call while tripped
    #[default]
    Suspend,

    /// Keep evaluating rules; the host is expected to warn
    Warn,
}

/// Circuit breaker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BreakerConfig {
    /// Blocked calls tolerated inside the window
    pub max_blocked: usize,

    /// Window length in milliseconds
    pub window_ms: u64,

    /// Action once the window fills
    #[serde(default)]
    pub action: BreakerAction,
}

/// Sliding-window block counter
pub struct CircuitBreaker {
    config: BreakerConfig,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl CircuitBreaker {
    /// Create a breaker in the untripped state
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// The configured action
    pub fn action(&self) -> BreakerAction {
        self.config.action
    }

    /// Prune expired timestamps, then report whether the breaker is tripped
    pub fn is_tripped(&self) -> bool {
        self.is_tripped_at(Instant::now())
    }

    fn is_tripped_at(&self, now: Instant) -> bool {
        let window = Duration::from_millis(self.config.window_ms);
        let mut timestamps = match self.timestamps.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) > window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
        timestamps.len() >= self.config.max_blocked
    }

    /// Record a blocked call
    pub fn record_block(&self) {
        self.record_block_at(Instant::now());
    }

    fn record_block_at(&self, now: Instant) {
        let mut timestamps = match self.timestamps.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        timestamps.push_back(now);
    }

    /// Reason string for a breaker-suspended call
    pub fn suspend_reason(&self) -> String {
        format!(
            "circuit breaker tripped: {} blocked calls within {}ms; tool activity suspended",
            self.config.max_blocked, self.config.window_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(max_blocked: usize, window_ms: u64) -> CircuitBreaker {
        CircuitBreaker::new(BreakerConfig {
            max_blocked,
            window_ms,
            action: BreakerAction::Suspend,
        })
    }

    #[test]
    fn test_untripped_when_empty() {
        let b = breaker(2, 60_000);
        assert!(!b.is_tripped());
    }

    #[test]
    fn test_trips_at_max_blocked() {
        let b = breaker(2, 60_000);
        b.record_block();
        assert!(!b.is_tripped());
        b.record_block();
        assert!(b.is_tripped());
    }

    #[test]
    fn test_expired_timestamps_pruned() {
        let b = breaker(2, 1_000);
        let start = Instant::now();
        b.record_block_at(start);
        b.record_block_at(start);
        assert!(b.is_tripped_at(start));
        // Past the window, both records expire.
        assert!(!b.is_tripped_at(start + Duration::from_millis(1_500)));
    }

    #[test]
    fn test_window_slides() {
        let b = breaker(2, 1_000);
        let start = Instant::now();
        b.record_block_at(start);
        b.record_block_at(start + Duration::from_millis(900));
        assert!(b.is_tripped_at(start + Duration::from_millis(950)));
        // First record expires; one block remains in the window.
        assert!(!b.is_tripped_at(start + Duration::from_millis(1_200)));
    }

    #[test]
    fn test_suspend_reason_names_window_and_count() {
        let b = breaker(3, 60_000);
        let reason = b.suspend_reason();
        assert!(reason.contains('3'));
        assert!(reason.contains("60000"));
    }

    #[test]
    fn test_action_deserialization() {
        let config: BreakerConfig =
            toml::from_str("max_blocked = 5\nwindow_ms = 1000\naction = \"warn\"").unwrap();
        assert_eq!(config.action, BreakerAction::Warn);

        let config: BreakerConfig =
            toml::from_str("max_blocked = 5\nwindow_ms = 1000").unwrap();
        assert_eq!(config.action, BreakerAction::Suspend);
    }
}
