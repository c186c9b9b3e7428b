//! Context capability names
//!
//! A tool declares which ambient capabilities it needs through its injection
//! contract, a list of [`ContextKey`]s. The set of capabilities is closed:
//! the execution context is a fixed-shape record, and injection/validation is
//! a match over these keys rather than a lookup in an open-ended map.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of a capability carried by the execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextKey {
    /// Filesystem access
    FileSystem,
    /// Browser session (current URL, tab state)
    Browser,
    /// LLM client for tools that call a model themselves
    Llm,
    /// Memory store
    Memory,
    /// Logger (always present)
    Logger,
    /// Free-form key/value configuration
    Config,
}

impl ContextKey {
    pub const ALL: [ContextKey; 6] = [
        ContextKey::FileSystem,
        ContextKey::Browser,
        ContextKey::Llm,
        ContextKey::Memory,
        ContextKey::Logger,
        ContextKey::Config,
    ];

    /// Parameter name used when the capability is injected.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::FileSystem => "fileSystem",
            ContextKey::Browser => "browser",
            ContextKey::Llm => "llm",
            ContextKey::Memory => "memory",
            ContextKey::Logger => "logger",
            ContextKey::Config => "config",
        }
    }
}

impl std::fmt::Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContextKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContextKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Unknown context key: {}", s))
    }
}
