//! Policy Resolver

use std::collections::HashMap;

use async_trait::async_trait;
use dispatch_domain::policy::{DomainPattern, matches_name};
use dispatch_domain::ToolDefinition;
use serde::Serialize;
use url::Url;

use super::{DomainRule, OverrideFn, PolicyConfig, RuleAction};
use crate::context::ExecutionContext;

/// Answer of a single layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerDecision {
    Allow,
    Deny,
    Neutral,
}

impl From<RuleAction> for LayerDecision {
    fn from(action: RuleAction) -> Self {
        match action {
            RuleAction::Allow => LayerDecision::Allow,
            RuleAction::Deny => LayerDecision::Deny,
        }
    }
}

/// Final answer of the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionResult {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Name of the layer that denied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

impl PermissionResult {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            layer: None,
        }
    }

    pub fn denied_by(layer: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(format!("Denied by {}", layer)),
            layer: Some(layer.to_string()),
        }
    }
}

/// One permission layer.
#[async_trait]
pub trait PolicyLayer: Send + Sync {
    fn name(&self) -> &str;

    async fn evaluate(&self, tool: &ToolDefinition, context: &ExecutionContext) -> LayerDecision;
}

// ==================== Built-in layers ====================

/// Name rules fixed at configuration time.
///
/// Exact names are checked first, then wildcard rules in declaration order.
struct StaticToolPolicy {
    exact: HashMap<String, RuleAction>,
    wildcard: Vec<(String, RuleAction)>,
}

impl StaticToolPolicy {
    fn new(config: &PolicyConfig) -> Self {
        let mut exact = HashMap::new();
        let mut wildcard = Vec::new();
        for (pattern, action) in &config.tools {
            if pattern.contains('*') {
                wildcard.push((pattern.clone(), *action));
            } else {
                exact.insert(pattern.clone(), *action);
            }
        }
        Self { exact, wildcard }
    }
}

#[async_trait]
impl PolicyLayer for StaticToolPolicy {
    fn name(&self) -> &str {
        "StaticToolPolicy"
    }

    async fn evaluate(&self, tool: &ToolDefinition, _context: &ExecutionContext) -> LayerDecision {
        if let Some(action) = self.exact.get(&tool.name) {
            return (*action).into();
        }
        self.wildcard
            .iter()
            .find(|(pattern, _)| matches_name(pattern, &tool.name))
            .map_or(LayerDecision::Neutral, |(_, action)| (*action).into())
    }
}

/// Per-tool host rules checked against the browser's current URL.
struct DomainRestrictions {
    rules: HashMap<String, Vec<DomainRule>>,
}

#[async_trait]
impl PolicyLayer for DomainRestrictions {
    fn name(&self) -> &str {
        "DomainRestrictions"
    }

    async fn evaluate(&self, tool: &ToolDefinition, context: &ExecutionContext) -> LayerDecision {
        let Some(rules) = self.rules.get(&tool.name).filter(|r| !r.is_empty()) else {
            return LayerDecision::Neutral;
        };
        let Some(url) = context
            .current_url()
            .and_then(|raw| Url::parse(&raw).ok())
        else {
            return LayerDecision::Neutral;
        };

        rules
            .iter()
            .find(|rule| DomainPattern::parse(&rule.pattern).matches(&url))
            .map_or(LayerDecision::Neutral, |rule| rule.action.into())
    }
}

/// Caller-supplied runtime decision.
struct ContextOverride {
    callback: Option<OverrideFn>,
}

#[async_trait]
impl PolicyLayer for ContextOverride {
    fn name(&self) -> &str {
        "ContextOverride"
    }

    async fn evaluate(&self, tool: &ToolDefinition, context: &ExecutionContext) -> LayerDecision {
        match &self.callback {
            Some(callback) if callback(tool, context) => LayerDecision::Allow,
            Some(_) => LayerDecision::Deny,
            None => LayerDecision::Neutral,
        }
    }
}

fn builtin_layers(config: &PolicyConfig) -> Vec<Box<dyn PolicyLayer>> {
    vec![
        Box::new(StaticToolPolicy::new(config)),
        Box::new(DomainRestrictions {
            rules: config
                .domains
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }),
        Box::new(ContextOverride {
            callback: config.override_fn.clone(),
        }),
    ]
}

// ==================== Resolver ====================

/// Deny-first evaluation over ordered layers.
pub struct PolicyResolver {
    layers: Vec<Box<dyn PolicyLayer>>,
}

impl Default for PolicyResolver {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

impl PolicyResolver {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            layers: builtin_layers(config),
        }
    }

    /// Evaluate every layer in order; the first deny decides.
    pub async fn resolve(
        &self,
        tool: &ToolDefinition,
        context: &ExecutionContext,
    ) -> PermissionResult {
        for layer in &self.layers {
            if layer.evaluate(tool, context).await == LayerDecision::Deny {
                tracing::debug!(tool = %tool.name, layer = layer.name(), "Tool denied by policy");
                return PermissionResult::denied_by(layer.name());
            }
        }
        PermissionResult::allowed()
    }

    /// Append a custom layer after the existing ones.
    pub fn add_layer(&mut self, layer: Box<dyn PolicyLayer>) {
        self.layers.push(layer);
    }

    /// Rebuild the built-in layers from `config`. Custom layers are dropped.
    pub fn update_config(&mut self, config: &PolicyConfig) {
        self.layers = builtin_layers(config);
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name()).collect()
    }
}

impl std::fmt::Debug for PolicyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyResolver")
            .field("layers", &self.layer_names())
            .finish()
    }
}
