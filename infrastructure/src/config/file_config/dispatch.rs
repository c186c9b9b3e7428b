//! Dispatch configuration from TOML (`[dispatch]` section)

use dispatch_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw dispatch configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Per-attempt timeout used when neither the call nor the tool sets one
    pub timeout_ms: u64,
    /// Pause between retry attempts
    pub retry_delay_ms: u64,
    /// Group for tools that declare none
    pub default_group: String,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            retry_delay_ms: 0,
            default_group: "default".to_string(),
        }
    }
}

impl FileDispatchConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.timeout_ms == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "dispatch.timeout_ms cannot be 0",
            ));
        }
        if self.default_group.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyDefaultGroup,
                "dispatch.default_group cannot be empty",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FileDispatchConfig::default().validate().is_empty());
    }

    #[test]
    fn test_zero_timeout_and_blank_group() {
        let config = FileDispatchConfig {
            timeout_ms: 0,
            retry_delay_ms: 0,
            default_group: "  ".to_string(),
        };
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![ConfigIssueCode::ZeroTimeout, ConfigIssueCode::EmptyDefaultGroup]
        );
    }
}
