//! Tool name policies and host restrictions
//!
//! A [`ToolPolicy`] is a pair of optional allow/deny name-pattern lists. Deny
//! always wins: a name matched by any deny pattern is rejected no matter what
//! the allow list says or in which order the patterns were declared.

pub mod domain_pattern;
pub mod pattern;

use serde::{Deserialize, Serialize};

pub use domain_pattern::{DomainPattern, extract_host, url_matches_any};
pub use pattern::{is_well_formed, matches_any, matches_name};

/// Allow/deny filter over tool names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<Vec<String>>,
}

impl ToolPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_deny<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn is_denied(&self, name: &str) -> bool {
        self.deny
            .as_deref()
            .is_some_and(|patterns| matches_any(patterns, name))
    }

    /// Two-stage check: deny first, then the allow list if it is non-empty.
    pub fn is_allowed(&self, name: &str) -> bool {
        if self.is_denied(name) {
            return false;
        }
        match self.allow.as_deref() {
            Some(patterns) if !patterns.is_empty() => matches_any(patterns, name),
            _ => true,
        }
    }

    /// Every pattern in either list, allow patterns first.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.allow
            .iter()
            .flatten()
            .chain(self.deny.iter().flatten())
            .map(String::as_str)
    }
}
