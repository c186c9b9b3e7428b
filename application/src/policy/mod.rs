//! Layered tool permissions
//!
//! [`PolicyResolver`] evaluates a tool against an ordered list of layers.
//! Each layer answers allow, deny or neutral; the first deny wins and a tool
//! nobody denies is allowed.
//!
//! | # | Layer | Source | Neutral when |
//! |---|-------|--------|--------------|
//! | 1 | `StaticToolPolicy` | `tools` rules | no rule matches the name |
//! | 2 | `DomainRestrictions` | `domains` rules | no rules for the tool, no browser URL, or no pattern matches |
//! | 3 | `ContextOverride` | override callback | no callback set |
//!
//! Custom layers can be appended with [`PolicyResolver::add_layer`].

pub mod builder;
pub mod profiles;
pub mod resolver;

use std::collections::BTreeMap;
use std::sync::Arc;

use dispatch_domain::ToolDefinition;
use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;

pub use builder::PolicyBuilder;
pub use resolver::{LayerDecision, PermissionResult, PolicyLayer, PolicyResolver};

/// What a matching rule does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Deny,
}

impl RuleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleAction::Allow => "allow",
            RuleAction::Deny => "deny",
        }
    }
}

/// A host pattern with the action taken when the browser is on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRule {
    pub pattern: String,
    pub action: RuleAction,
}

impl DomainRule {
    pub fn allow(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: RuleAction::Allow,
        }
    }

    pub fn deny(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            action: RuleAction::Deny,
        }
    }
}

/// Runtime callback: `true` allows, `false` denies.
pub type OverrideFn = Arc<dyn Fn(&ToolDefinition, &ExecutionContext) -> bool + Send + Sync>;

/// Input of a [`PolicyResolver`].
#[derive(Clone, Default)]
pub struct PolicyConfig {
    /// Name rules in declaration order; wildcard rules are tried in this order
    pub tools: Vec<(String, RuleAction)>,
    /// Tool name -> host rules
    pub domains: BTreeMap<String, Vec<DomainRule>>,
    pub override_fn: Option<OverrideFn>,
}

impl PolicyConfig {
    /// Set the action for `pattern`, keeping its original position if it
    /// was already declared.
    pub fn set_tool_rule(&mut self, pattern: impl Into<String>, action: RuleAction) {
        let pattern = pattern.into();
        match self.tools.iter_mut().find(|(p, _)| *p == pattern) {
            Some((_, existing)) => *existing = action,
            None => self.tools.push((pattern, action)),
        }
    }

    pub fn tool_rule(&self, pattern: &str) -> Option<RuleAction> {
        self.tools
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, action)| *action)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.domains.is_empty() && self.override_fn.is_none()
    }
}

impl std::fmt::Debug for PolicyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyConfig")
            .field("tools", &self.tools)
            .field("domains", &self.domains)
            .field("override_fn", &self.override_fn.is_some())
            .finish()
    }
}
