//! Monitor configuration from TOML (`[monitor]` section)

use dispatch_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw monitor configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMonitorConfig {
    /// History cap; oldest records are evicted beyond it
    pub max_records: usize,
    /// How many failures `recent failures` reports by default
    pub recent_failures: usize,
}

impl Default for FileMonitorConfig {
    fn default() -> Self {
        Self {
            max_records: 1000,
            recent_failures: 10,
        }
    }
}

impl FileMonitorConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.max_records == 0 {
            vec![ConfigIssue::warning(
                ConfigIssueCode::ZeroMonitorCap,
                "monitor.max_records is 0, no execution history will be kept",
            )]
        } else {
            Vec::new()
        }
    }
}
