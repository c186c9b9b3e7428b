//! Parameter Injector
//!
//! Wires context capabilities into a tool's parameters according to its
//! injection contract. Validation is kept separate from injection so the
//! executor can fail before the tool is touched at all.

use dispatch_domain::{ContextKey, ToolDefinition};
use serde_json::{Map, Value};

use crate::context::ExecutionContext;
use crate::tool::ToolInput;

/// Outcome of [`ParamInjector::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionCheck {
    pub valid: bool,
    pub missing: Vec<ContextKey>,
}

/// Stateless injector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamInjector;

impl ParamInjector {
    pub fn new() -> Self {
        Self
    }

    /// The tool's injection contract, verbatim.
    pub fn detect_required_params<'a>(&self, tool: &'a ToolDefinition) -> &'a [ContextKey] {
        &tool.inject
    }

    /// Build the final input.
    ///
    /// Each declared key is filled from `context` unless `params` already has
    /// an entry of that name; pre-supplied values are never overwritten.
    /// Returns the input and the keys that were actually injected.
    pub fn inject(
        &self,
        params: Map<String, Value>,
        context: &ExecutionContext,
        tool: &ToolDefinition,
    ) -> (ToolInput, Vec<ContextKey>) {
        let mut input = ToolInput::new(params);
        let mut injected = Vec::new();

        for key in self.detect_required_params(tool) {
            if input.contains(*key) {
                continue;
            }
            if let Some(value) = context.get(*key) {
                input.set(value);
                injected.push(*key);
            }
        }

        (input, injected)
    }

    /// Report declared capabilities the context does not have.
    pub fn validate(&self, tool: &ToolDefinition, context: &ExecutionContext) -> InjectionCheck {
        let missing: Vec<ContextKey> = self
            .detect_required_params(tool)
            .iter()
            .copied()
            .filter(|key| !context.has(*key))
            .collect();

        InjectionCheck {
            valid: missing.is_empty(),
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextOptions, ExecutionContextManager};
    use crate::ports::BrowserSession;
    use serde_json::json;
    use std::sync::Arc;

    struct Browser(&'static str);

    impl BrowserSession for Browser {
        fn current_url(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn context_with_browser() -> ExecutionContext {
        ExecutionContextManager::new().create(
            ContextOptions::new()
                .with_browser(Arc::new(Browser("https://example.com")))
                .with_config_value("mode", json!("fast")),
        )
    }

    #[test]
    fn test_detect_returns_contract_verbatim() {
        let tool = ToolDefinition::new("t", "T")
            .with_inject(ContextKey::Memory)
            .with_inject(ContextKey::Browser);
        assert_eq!(
            ParamInjector::new().detect_required_params(&tool),
            &[ContextKey::Memory, ContextKey::Browser]
        );
        assert!(
            ParamInjector::new()
                .detect_required_params(&ToolDefinition::new("u", "U"))
                .is_empty()
        );
    }

    #[test]
    fn test_inject_fills_declared_slots() {
        let tool = ToolDefinition::new("t", "T")
            .with_inject(ContextKey::Browser)
            .with_inject(ContextKey::Config);
        let (input, injected) =
            ParamInjector::new().inject(Map::new(), &context_with_browser(), &tool);

        assert!(input.browser.is_some());
        assert_eq!(
            input.config.as_ref().and_then(|c| c.get("mode")),
            Some(&json!("fast"))
        );
        assert!(input.logger.is_none());
        assert_eq!(injected, vec![ContextKey::Browser, ContextKey::Config]);
    }

    #[test]
    fn test_inject_never_overwrites_supplied_params() {
        let tool = ToolDefinition::new("t", "T").with_inject(ContextKey::Config);
        let mut params = Map::new();
        params.insert("config".to_string(), json!({ "mode": "slow" }));

        let (input, injected) = ParamInjector::new().inject(params, &context_with_browser(), &tool);

        assert!(input.config.is_none());
        assert_eq!(input.arg("config"), Some(&json!({ "mode": "slow" })));
        assert!(injected.is_empty());
    }

    #[test]
    fn test_validate_reports_missing() {
        let tool = ToolDefinition::new("t", "T")
            .with_inject(ContextKey::Browser)
            .with_inject(ContextKey::FileSystem)
            .with_inject(ContextKey::Logger);
        let check = ParamInjector::new().validate(&tool, &context_with_browser());

        assert!(!check.valid);
        assert_eq!(check.missing, vec![ContextKey::FileSystem]);
    }

    #[test]
    fn test_validate_passes_without_contract() {
        let check = ParamInjector::new().validate(
            &ToolDefinition::new("t", "T"),
            &ExecutionContext::default(),
        );
        assert!(check.valid);
        assert!(check.missing.is_empty());
    }
}
