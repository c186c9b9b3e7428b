//! Fluent construction of [`PolicyConfig`]s.

use dispatch_domain::ToolDefinition;
use std::sync::Arc;

use super::{DomainRule, PolicyConfig, RuleAction};
use crate::context::ExecutionContext;

/// Chainable builder over a [`PolicyConfig`].
///
/// ```
/// use dispatch_application::policy::{PolicyBuilder, PolicyResolver};
///
/// let config = PolicyBuilder::new()
///     .allow("browser_*")
///     .deny("*")
///     .allow_on_domains("browser_navigate", ["*.github.com", "github.com"])
///     .build();
/// let resolver = PolicyResolver::new(&config);
/// # let _ = resolver;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    config: PolicyConfig,
}

impl PolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a copy of an existing config.
    pub fn from(config: &PolicyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn allow(mut self, pattern: impl Into<String>) -> Self {
        self.config.set_tool_rule(pattern, RuleAction::Allow);
        self
    }

    pub fn deny(mut self, pattern: impl Into<String>) -> Self {
        self.config.set_tool_rule(pattern, RuleAction::Deny);
        self
    }

    pub fn allow_tools<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        patterns.into_iter().fold(self, |b, p| b.allow(p))
    }

    pub fn deny_tools<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        patterns.into_iter().fold(self, |b, p| b.deny(p))
    }

    /// Replace `tool`'s host rules with allow rules for `domains`.
    pub fn allow_on_domains<I, S>(self, tool: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_rules(tool, domains.into_iter().map(DomainRule::allow).collect())
    }

    /// Replace `tool`'s host rules with deny rules for `domains`.
    pub fn deny_on_domains<I, S>(self, tool: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain_rules(tool, domains.into_iter().map(DomainRule::deny).collect())
    }

    fn domain_rules(mut self, tool: impl Into<String>, rules: Vec<DomainRule>) -> Self {
        self.config.domains.insert(tool.into(), rules);
        self
    }

    pub fn set_override<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ToolDefinition, &ExecutionContext) -> bool + Send + Sync + 'static,
    {
        self.config.override_fn = Some(Arc::new(callback));
        self
    }

    /// Fold `other` into this builder.
    ///
    /// Tool rules are upserted, domain rules replace per tool, and the
    /// override is only taken when this builder has none.
    pub fn merge(mut self, other: &PolicyConfig) -> Self {
        for (pattern, action) in &other.tools {
            self.config.set_tool_rule(pattern.clone(), *action);
        }
        for (tool, rules) in &other.domains {
            self.config.domains.insert(tool.clone(), rules.clone());
        }
        if self.config.override_fn.is_none() {
            self.config.override_fn = other.override_fn.clone();
        }
        self
    }

    /// Same as [`merge`](Self::merge); reads better with a profile.
    pub fn extend(self, profile: &PolicyConfig) -> Self {
        self.merge(profile)
    }

    pub fn clear(mut self) -> Self {
        self.config = PolicyConfig::default();
        self
    }

    pub fn build(&self) -> PolicyConfig {
        self.config.clone()
    }
}
