//! Policy configuration from TOML (`[policy]` section)
//!
//! `allow`/`deny` feed the registry's name filter. `profile` selects one of
//! the built-in layered policies evaluated right before a tool runs.

use dispatch_application::policy::{PolicyConfig, profiles};
use dispatch_domain::policy::is_well_formed;
use dispatch_domain::{ConfigIssue, ConfigIssueCode, ToolPolicy};
use serde::{Deserialize, Serialize};

/// Raw policy configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    /// Built-in profile name (see `profiles::PROFILE_NAMES`)
    pub profile: Option<String>,
    pub allow: Option<Vec<String>>,
    pub deny: Option<Vec<String>>,
}

impl FilePolicyConfig {
    pub fn to_tool_policy(&self) -> ToolPolicy {
        ToolPolicy {
            allow: self.allow.clone(),
            deny: self.deny.clone(),
        }
    }

    /// The selected profile, with a warning when the name is unknown.
    pub fn parse_profile(&self) -> (PolicyConfig, Vec<ConfigIssue>) {
        let Some(name) = self.profile.as_deref() else {
            return (PolicyConfig::default(), Vec::new());
        };
        match profiles::by_name(name) {
            Some(config) => (config, Vec::new()),
            None => (
                PolicyConfig::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownProfile,
                    format!(
                        "policy.profile: unknown profile '{}', valid values: {}",
                        name,
                        profiles::PROFILE_NAMES.join(", ")
                    ),
                )],
            ),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, patterns) in [("allow", &self.allow), ("deny", &self.deny)] {
            for pattern in patterns.iter().flatten() {
                if !is_well_formed(pattern) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::MalformedPattern,
                        format!(
                            "policy.{}: '{}' must be a name or use a single leading or trailing '*'",
                            field, pattern
                        ),
                    ));
                }
            }
        }

        if let (Some(allow), Some(deny)) = (&self.allow, &self.deny) {
            for pattern in allow.iter().filter(|p| deny.contains(p)) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OverlappingPolicy,
                    format!("policy: '{}' is in both allow and deny; deny wins", pattern),
                ));
            }
        }

        issues.extend(self.parse_profile().1);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_application::policy::RuleAction;

    #[test]
    fn test_to_tool_policy() {
        let config = FilePolicyConfig {
            profile: None,
            allow: Some(vec!["browser_*".to_string()]),
            deny: Some(vec!["browser_evaluate".to_string()]),
        };
        let policy = config.to_tool_policy();
        assert!(policy.is_allowed("browser_click"));
        assert!(!policy.is_allowed("browser_evaluate"));
        assert!(!policy.is_allowed("read_file"));
    }

    #[test]
    fn test_known_profile() {
        let config = FilePolicyConfig {
            profile: Some("browser_only".to_string()),
            ..Default::default()
        };
        let (profile, issues) = config.parse_profile();
        assert!(issues.is_empty());
        assert_eq!(profile.tool_rule("*"), Some(RuleAction::Deny));
    }

    #[test]
    fn test_unknown_profile_warns() {
        let config = FilePolicyConfig {
            profile: Some("yolo".to_string()),
            ..Default::default()
        };
        let (profile, issues) = config.parse_profile();
        assert!(profile.is_empty());
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownProfile);
    }

    #[test]
    fn test_validate_patterns_and_overlap() {
        let config = FilePolicyConfig {
            profile: None,
            allow: Some(vec!["a*b".to_string(), "read_file".to_string()]),
            deny: Some(vec!["read_file".to_string()]),
        };
        let issues = config.validate();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].code, ConfigIssueCode::MalformedPattern);
        assert!(issues[0].is_error());
        assert_eq!(issues[1].code, ConfigIssueCode::OverlappingPolicy);
    }
}
