//! Ready-made policy configurations.

use super::{DomainRule, PolicyConfig};
use super::builder::PolicyBuilder;

const GITHUB_HOSTS: [&str; 2] = ["*.github.com", "github.com"];

/// Names accepted by [`by_name`].
pub const PROFILE_NAMES: &[&str] = &[
    "allow_all",
    "deny_all",
    "browser_only",
    "browser_and_file_read",
    "browser_github_only",
    "safe_tools_only",
];

pub fn allow_all() -> PolicyConfig {
    PolicyBuilder::new().allow("*").build()
}

pub fn deny_all() -> PolicyConfig {
    PolicyBuilder::new().deny("*").build()
}

pub fn browser_only() -> PolicyConfig {
    PolicyBuilder::new().allow("browser_*").deny("*").build()
}

pub fn browser_and_file_read() -> PolicyConfig {
    PolicyBuilder::new()
        .allow_tools(["browser_*", "read_file"])
        .deny("*")
        .build()
}

/// Browser tools only, and the page-changing ones only on GitHub.
pub fn browser_github_only() -> PolicyConfig {
    let mut config = browser_only();
    for tool in ["browser_navigate", "browser_click", "browser_fill"] {
        let mut rules: Vec<DomainRule> = GITHUB_HOSTS.iter().map(|h| DomainRule::allow(*h)).collect();
        rules.push(DomainRule::deny("*"));
        config.domains.insert(tool.to_string(), rules);
    }
    config
}

/// Read-only and browsing tools; nothing that writes or runs code.
pub fn safe_tools_only() -> PolicyConfig {
    PolicyBuilder::new()
        .allow_tools(["browser_*", "read_file", "web_search", "web_fetch", "memory_*"])
        .deny("*")
        .build()
}

/// Look a profile up by its snake_case name.
pub fn by_name(name: &str) -> Option<PolicyConfig> {
    let config = match name {
        "allow_all" => allow_all(),
        "deny_all" => deny_all(),
        "browser_only" => browser_only(),
        "browser_and_file_read" => browser_and_file_read(),
        "browser_github_only" => browser_github_only(),
        "safe_tools_only" => safe_tools_only(),
        _ => return None,
    };
    Some(config)
}
