//! Dispatch defaults read once at construction.
//!
//! [`DispatchConfig`] is the host configuration surface of the dispatcher.
//! The executor, scheduler, registry and monitor copy what they need from it
//! when they are built; nothing re-reads it per call.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Group used for tools that do not declare one.
pub const DEFAULT_GROUP: &str = "default";

/// Host-wide dispatch defaults.
///
/// | Field | Default | Used by |
/// |-------|---------|---------|
/// | `default_timeout` | 30 s | executor (when neither options nor tool set one) |
/// | `default_retry_delay` | 0 | executor (between attempts) |
/// | `default_group` | `"default"` | registry, scheduler |
/// | `max_monitor_records` | 1000 | monitor |
/// | `recent_failures_limit` | 10 | monitor |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub default_timeout: Duration,
    pub default_retry_delay: Duration,
    pub default_group: String,
    pub max_monitor_records: usize,
    pub recent_failures_limit: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            default_retry_delay: Duration::ZERO,
            default_group: DEFAULT_GROUP.to_string(),
            max_monitor_records: 1000,
            recent_failures_limit: 10,
        }
    }
}

impl DispatchConfig {
    // ==================== Builder Methods ====================

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_default_retry_delay(mut self, delay: Duration) -> Self {
        self.default_retry_delay = delay;
        self
    }

    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    pub fn with_max_monitor_records(mut self, max: usize) -> Self {
        self.max_monitor_records = max;
        self
    }

    pub fn with_recent_failures_limit(mut self, limit: usize) -> Self {
        self.recent_failures_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = DispatchConfig::default();
        assert_eq!(config.default_timeout, Duration::from_secs(30));
        assert_eq!(config.default_retry_delay, Duration::ZERO);
        assert_eq!(config.default_group, "default");
        assert_eq!(config.max_monitor_records, 1000);
        assert_eq!(config.recent_failures_limit, 10);
    }

    #[test]
    fn test_builder() {
        let config = DispatchConfig::default()
            .with_default_timeout(Duration::from_millis(500))
            .with_default_group("main")
            .with_max_monitor_records(5);

        assert_eq!(config.default_timeout, Duration::from_millis(500));
        assert_eq!(config.default_group, "main");
        assert_eq!(config.max_monitor_records, 5);
    }
}
