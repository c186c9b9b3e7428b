//! Execution context and its manager
//!
//! An [`ExecutionContext`] is the fixed-shape bag of capabilities a tool may
//! depend on. Only the logger is always present; every other capability is
//! optional and is checked against a tool's injection contract before the
//! tool runs.
//!
//! Contexts are cheap to clone: capability handles are `Arc`s shared by
//! reference across every concurrently executing tool.

use crate::ports::{BrowserSession, FileSystem, LlmClient, MemoryStore};
use dispatch_domain::ContextKey;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Logger handed to tools.
///
/// Emits `tracing` events tagged with the logger's name so tool output shows
/// up in the same subscriber as the dispatcher's own diagnostics.
#[derive(Debug, Clone)]
pub struct ToolLogger {
    name: Arc<str>,
}

impl ToolLogger {
    pub const DEFAULT_NAME: &'static str = "Tool";

    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!(logger = %self.name, "{}", message);
    }

    pub fn info(&self, message: &str) {
        tracing::info!(logger = %self.name, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!(logger = %self.name, "{}", message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!(logger = %self.name, "{}", message);
    }
}

impl Default for ToolLogger {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME)
    }
}

/// One capability pulled out of a context by name.
#[derive(Clone)]
pub enum ContextValue {
    FileSystem(Arc<dyn FileSystem>),
    Browser(Arc<dyn BrowserSession>),
    Llm(Arc<dyn LlmClient>),
    Memory(Arc<dyn MemoryStore>),
    Logger(ToolLogger),
    Config(Map<String, Value>),
}

impl ContextValue {
    pub fn key(&self) -> ContextKey {
        match self {
            ContextValue::FileSystem(_) => ContextKey::FileSystem,
            ContextValue::Browser(_) => ContextKey::Browser,
            ContextValue::Llm(_) => ContextKey::Llm,
            ContextValue::Memory(_) => ContextKey::Memory,
            ContextValue::Logger(_) => ContextKey::Logger,
            ContextValue::Config(_) => ContextKey::Config,
        }
    }
}

impl std::fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextValue::Config(map) => f.debug_tuple("Config").field(map).finish(),
            ContextValue::Logger(logger) => f.debug_tuple("Logger").field(logger).finish(),
            other => write!(f, "{}", other.key()),
        }
    }
}

/// Capabilities available to a tool at call time.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    pub logger: ToolLogger,
    pub file_system: Option<Arc<dyn FileSystem>>,
    pub browser: Option<Arc<dyn BrowserSession>>,
    pub llm: Option<Arc<dyn LlmClient>>,
    pub memory: Option<Arc<dyn MemoryStore>>,
    pub config: Option<Map<String, Value>>,
}

impl ExecutionContext {
    /// Look up a capability by name.
    pub fn get(&self, key: ContextKey) -> Option<ContextValue> {
        match key {
            ContextKey::FileSystem => self.file_system.clone().map(ContextValue::FileSystem),
            ContextKey::Browser => self.browser.clone().map(ContextValue::Browser),
            ContextKey::Llm => self.llm.clone().map(ContextValue::Llm),
            ContextKey::Memory => self.memory.clone().map(ContextValue::Memory),
            ContextKey::Logger => Some(ContextValue::Logger(self.logger.clone())),
            ContextKey::Config => self.config.clone().map(ContextValue::Config),
        }
    }

    pub fn has(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::FileSystem => self.file_system.is_some(),
            ContextKey::Browser => self.browser.is_some(),
            ContextKey::Llm => self.llm.is_some(),
            ContextKey::Memory => self.memory.is_some(),
            ContextKey::Logger => true,
            ContextKey::Config => self.config.is_some(),
        }
    }

    /// Keys of every capability currently present.
    pub fn available(&self) -> Vec<ContextKey> {
        ContextKey::ALL
            .into_iter()
            .filter(|key| self.has(*key))
            .collect()
    }

    /// The browser's current URL, if there is a browser and it reports one.
    pub fn current_url(&self) -> Option<String> {
        self.browser.as_ref().and_then(|b| b.current_url())
    }

    /// A single config entry.
    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.as_ref().and_then(|c| c.get(key))
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("logger", &self.logger)
            .field("available", &self.available())
            .field("config", &self.config)
            .finish()
    }
}

/// Partial context used to create, extend or narrow an [`ExecutionContext`].
#[derive(Clone, Default)]
pub struct ContextOptions {
    pub logger: Option<ToolLogger>,
    pub file_system: Option<Arc<dyn FileSystem>>,
    pub browser: Option<Arc<dyn BrowserSession>>,
    pub llm: Option<Arc<dyn LlmClient>>,
    pub memory: Option<Arc<dyn MemoryStore>>,
    pub config: Option<Map<String, Value>>,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Builder Methods ====================

    pub fn with_logger(mut self, logger: ToolLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(fs);
        self
    }

    pub fn with_browser(mut self, browser: Arc<dyn BrowserSession>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_memory(mut self, memory: Arc<dyn MemoryStore>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_config_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }
}

/// Builds, merges and validates execution contexts.
#[derive(Debug, Clone)]
pub struct ExecutionContextManager {
    default_logger_name: String,
}

impl Default for ExecutionContextManager {
    fn default() -> Self {
        Self {
            default_logger_name: ToolLogger::DEFAULT_NAME.to_string(),
        }
    }
}

impl ExecutionContextManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_logger_name(mut self, name: impl Into<String>) -> Self {
        self.default_logger_name = name.into();
        self
    }

    /// Create a context, default-constructing the logger when omitted.
    pub fn create(&self, options: ContextOptions) -> ExecutionContext {
        ExecutionContext {
            logger: options
                .logger
                .unwrap_or_else(|| ToolLogger::new(&self.default_logger_name)),
            file_system: options.file_system,
            browser: options.browser,
            llm: options.llm,
            memory: options.memory,
            config: options.config,
        }
    }

    /// Overlay `extra` on `base`.
    ///
    /// Capabilities present in `extra` replace `base`'s. Config maps are
    /// shallow-merged with `extra`'s keys winning, and the result always
    /// carries a config map (possibly empty).
    pub fn merge(&self, base: &ExecutionContext, extra: ContextOptions) -> ExecutionContext {
        let mut config = base.config.clone().unwrap_or_default();
        if let Some(extra_config) = extra.config {
            config.extend(extra_config);
        }

        ExecutionContext {
            logger: extra.logger.unwrap_or_else(|| base.logger.clone()),
            file_system: extra.file_system.or_else(|| base.file_system.clone()),
            browser: extra.browser.or_else(|| base.browser.clone()),
            llm: extra.llm.or_else(|| base.llm.clone()),
            memory: extra.memory.or_else(|| base.memory.clone()),
            config: Some(config),
        }
    }

    /// Child context for a nested invocation; same rules as [`merge`](Self::merge).
    pub fn create_child(
        &self,
        parent: &ExecutionContext,
        overrides: ContextOptions,
    ) -> ExecutionContext {
        self.merge(parent, overrides)
    }

    /// Whether every required capability is present.
    pub fn validate(&self, context: &ExecutionContext, requirements: &[ContextKey]) -> bool {
        requirements.iter().all(|key| context.has(*key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticBrowser(Option<String>);

    impl BrowserSession for StaticBrowser {
        fn current_url(&self) -> Option<String> {
            self.0.clone()
        }
    }

    fn browser(url: &str) -> Arc<dyn BrowserSession> {
        Arc::new(StaticBrowser(Some(url.to_string())))
    }

    // ==================== create ====================

    #[test]
    fn test_create_defaults_logger() {
        let manager = ExecutionContextManager::new();
        let ctx = manager.create(ContextOptions::new());

        assert_eq!(ctx.logger.name(), "Tool");
        assert!(ctx.has(ContextKey::Logger));
        assert!(!ctx.has(ContextKey::Browser));
        assert!(ctx.config.is_none());
        assert_eq!(ctx.available(), vec![ContextKey::Logger]);
    }

    #[test]
    fn test_create_keeps_supplied_logger() {
        let manager = ExecutionContextManager::new().with_default_logger_name("Other");
        let ctx = manager.create(ContextOptions::new().with_logger(ToolLogger::new("Custom")));
        assert_eq!(ctx.logger.name(), "Custom");

        let ctx = manager.create(ContextOptions::new());
        assert_eq!(ctx.logger.name(), "Other");
    }

    // ==================== merge ====================

    #[test]
    fn test_merge_overrides_capabilities() {
        let manager = ExecutionContextManager::new();
        let base = manager.create(ContextOptions::new().with_browser(browser("https://a.com")));
        let merged = manager.merge(
            &base,
            ContextOptions::new().with_browser(browser("https://b.com")),
        );

        assert_eq!(merged.current_url().as_deref(), Some("https://b.com"));
        assert_eq!(base.current_url().as_deref(), Some("https://a.com"));
    }

    #[test]
    fn test_merge_keeps_base_capabilities() {
        let manager = ExecutionContextManager::new();
        let base = manager.create(ContextOptions::new().with_browser(browser("https://a.com")));
        let merged = manager.merge(&base, ContextOptions::new());

        assert!(merged.has(ContextKey::Browser));
        assert_eq!(merged.logger.name(), base.logger.name());
    }

    #[test]
    fn test_merge_shallow_merges_config() {
        let manager = ExecutionContextManager::new();
        let base = manager.create(
            ContextOptions::new()
                .with_config_value("a", json!(1))
                .with_config_value("b", json!(2)),
        );
        let merged = manager.merge(
            &base,
            ContextOptions::new()
                .with_config_value("b", json!(20))
                .with_config_value("c", json!(30)),
        );

        assert_eq!(merged.config_value("a"), Some(&json!(1)));
        assert_eq!(merged.config_value("b"), Some(&json!(20)));
        assert_eq!(merged.config_value("c"), Some(&json!(30)));
    }

    #[test]
    fn test_merge_always_yields_config() {
        let manager = ExecutionContextManager::new();
        let base = manager.create(ContextOptions::new());
        let child = manager.create_child(&base, ContextOptions::new());

        assert!(child.has(ContextKey::Config));
        assert!(child.config.as_ref().is_some_and(|c| c.is_empty()));
    }

    // ==================== validate / get ====================

    #[test]
    fn test_validate_requirements() {
        let manager = ExecutionContextManager::new();
        let ctx = manager.create(ContextOptions::new().with_browser(browser("https://a.com")));

        assert!(manager.validate(&ctx, &[]));
        assert!(manager.validate(&ctx, &[ContextKey::Browser, ContextKey::Logger]));
        assert!(!manager.validate(&ctx, &[ContextKey::Browser, ContextKey::FileSystem]));
    }

    #[test]
    fn test_get_returns_matching_value() {
        let manager = ExecutionContextManager::new();
        let ctx = manager.create(ContextOptions::new().with_config_value("k", json!("v")));

        let value = ctx.get(ContextKey::Config).unwrap();
        assert_eq!(value.key(), ContextKey::Config);
        assert!(ctx.get(ContextKey::Memory).is_none());
        assert!(matches!(
            ctx.get(ContextKey::Logger),
            Some(ContextValue::Logger(_))
        ));
    }

    #[test]
    fn test_current_url_without_browser() {
        let ctx = ExecutionContextManager::new().create(ContextOptions::new());
        assert!(ctx.current_url().is_none());
    }
}
