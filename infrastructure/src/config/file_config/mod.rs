//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod dispatch;
mod log;
mod monitor;
mod output;
mod policy;

pub use dispatch::FileDispatchConfig;
pub use log::FileLogConfig;
pub use monitor::FileMonitorConfig;
pub use output::FileOutputConfig;
pub use policy::FilePolicyConfig;

use dispatch_application::DispatchConfig;
use dispatch_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Timeouts, retries and grouping
    pub dispatch: FileDispatchConfig,
    /// Execution history
    pub monitor: FileMonitorConfig,
    /// Tool name filter and layered profile
    pub policy: FilePolicyConfig,
    /// Tracing and JSONL audit log
    pub log: FileLogConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.dispatch.validate();
        issues.extend(self.monitor.validate());
        issues.extend(self.policy.validate());
        issues
    }

    /// Host configuration for the executor, scheduler and monitor.
    pub fn to_dispatch_config(&self) -> DispatchConfig {
        DispatchConfig::default()
            .with_default_timeout(Duration::from_millis(self.dispatch.timeout_ms))
            .with_default_retry_delay(Duration::from_millis(self.dispatch.retry_delay_ms))
            .with_default_group(self.dispatch.default_group.clone())
            .with_max_monitor_records(self.monitor.max_records)
            .with_recent_failures_limit(self.monitor.recent_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_domain::{ConfigIssueCode, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[dispatch]
timeout_ms = 5000
retry_delay_ms = 250
default_group = "shared"

[monitor]
max_records = 50
recent_failures = 3

[policy]
profile = "safe_tools_only"
deny = ["write_file"]

[log]
level = "debug"
jsonl = "logs/executions.jsonl"

[output]
format = "json"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dispatch.timeout_ms, 5000);
        assert_eq!(config.dispatch.default_group, "shared");
        assert_eq!(config.monitor.max_records, 50);
        assert_eq!(config.policy.profile.as_deref(), Some("safe_tools_only"));
        assert_eq!(config.log.level.as_deref(), Some("debug"));
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[dispatch]
retry_delay_ms = 100
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dispatch.retry_delay_ms, 100);
        // Defaults should apply
        assert_eq!(config.dispatch.timeout_ms, 30_000);
        assert_eq!(config.monitor.max_records, 1000);
        assert!(config.policy.allow.is_none());
    }

    #[test]
    fn test_to_dispatch_config() {
        let mut config = FileConfig::default();
        config.dispatch.timeout_ms = 1500;
        config.monitor.recent_failures = 4;

        let dispatch = config.to_dispatch_config();
        assert_eq!(dispatch.default_timeout, Duration::from_millis(1500));
        assert_eq!(dispatch.default_retry_delay, Duration::ZERO);
        assert_eq!(dispatch.default_group, "default");
        assert_eq!(dispatch.max_monitor_records, 1000);
        assert_eq!(dispatch.recent_failures_limit, 4);
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let mut config = FileConfig::default();
        config.dispatch.timeout_ms = 0;
        config.monitor.max_records = 0;

        let issues = config.validate();
        let codes: Vec<_> = issues.iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![ConfigIssueCode::ZeroTimeout, ConfigIssueCode::ZeroMonitorCap]
        );
        assert!(issues[0].is_error());
        assert!(!issues[1].is_error());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_empty());
    }
}
