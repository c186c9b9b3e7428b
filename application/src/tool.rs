//! Executable tools
//!
//! A [`Tool`] pairs an immutable [`ToolDefinition`] with the
//! [`ToolHandler`] that runs it. Handlers receive a [`ToolInput`]: the
//! caller's argument map plus whatever capabilities were injected from the
//! execution context according to the tool's injection contract.

use crate::context::{ContextValue, ExecutionContext, ToolLogger};
use crate::ports::{BrowserSession, FileSystem, LlmClient, MemoryStore};
use async_trait::async_trait;
use dispatch_domain::{ContextKey, ToolDefinition, ToolError};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

/// Code that runs a tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn execute(
        &self,
        input: ToolInput,
        context: &ExecutionContext,
    ) -> Result<Value, ToolError>;
}

/// Handler built from an async closure.
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(ToolInput, ExecutionContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    async fn execute(
        &self,
        input: ToolInput,
        context: &ExecutionContext,
    ) -> Result<Value, ToolError> {
        (self.f)(input, context.clone()).await
    }
}

/// A registered, runnable tool.
#[derive(Clone)]
pub struct Tool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

impl Tool {
    pub fn new(definition: ToolDefinition, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            definition,
            handler,
        }
    }

    /// Build a tool from an async closure.
    pub fn from_fn<F, Fut>(definition: ToolDefinition, f: F) -> Self
    where
        F: Fn(ToolInput, ExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        Self::new(definition, Arc::new(FnHandler { f }))
    }

    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Parameters handed to a [`ToolHandler`].
///
/// `args` holds the caller-supplied, JSON-shaped parameters. Capability slots
/// are filled by the injector for every key in the tool's injection contract
/// that the caller did not already supply under the same name.
#[derive(Clone, Default)]
pub struct ToolInput {
    pub args: Map<String, Value>,
    pub file_system: Option<Arc<dyn FileSystem>>,
    pub browser: Option<Arc<dyn BrowserSession>>,
    pub llm: Option<Arc<dyn LlmClient>>,
    pub memory: Option<Arc<dyn MemoryStore>>,
    pub logger: Option<ToolLogger>,
    pub config: Option<Map<String, Value>>,
}

impl ToolInput {
    pub fn new(args: Map<String, Value>) -> Self {
        Self {
            args,
            ..Self::default()
        }
    }

    /// Whether `key` is already supplied, either as an argument or a filled slot.
    pub fn contains(&self, key: ContextKey) -> bool {
        if self.args.contains_key(key.as_str()) {
            return true;
        }
        match key {
            ContextKey::FileSystem => self.file_system.is_some(),
            ContextKey::Browser => self.browser.is_some(),
            ContextKey::Llm => self.llm.is_some(),
            ContextKey::Memory => self.memory.is_some(),
            ContextKey::Logger => self.logger.is_some(),
            ContextKey::Config => self.config.is_some(),
        }
    }

    /// Fill the slot matching `value`.
    pub fn set(&mut self, value: ContextValue) {
        match value {
            ContextValue::FileSystem(v) => self.file_system = Some(v),
            ContextValue::Browser(v) => self.browser = Some(v),
            ContextValue::Llm(v) => self.llm = Some(v),
            ContextValue::Memory(v) => self.memory = Some(v),
            ContextValue::Logger(v) => self.logger = Some(v),
            ContextValue::Config(v) => self.config = Some(v),
        }
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    pub fn str_arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).and_then(Value::as_str)
    }

    /// A string argument that must be present.
    pub fn require_str(&self, name: &str) -> Result<&str, ToolError> {
        self.str_arg(name).ok_or_else(|| {
            ToolError::invalid_argument(format!("Missing required parameter: {}", name))
        })
    }

    /// The injected filesystem, or an error naming the missing capability.
    pub fn require_file_system(&self) -> Result<&Arc<dyn FileSystem>, ToolError> {
        self.file_system
            .as_ref()
            .ok_or_else(|| missing_slot(ContextKey::FileSystem))
    }

    pub fn require_browser(&self) -> Result<&Arc<dyn BrowserSession>, ToolError> {
        self.browser
            .as_ref()
            .ok_or_else(|| missing_slot(ContextKey::Browser))
    }

    pub fn require_llm(&self) -> Result<&Arc<dyn LlmClient>, ToolError> {
        self.llm.as_ref().ok_or_else(|| missing_slot(ContextKey::Llm))
    }

    pub fn require_memory(&self) -> Result<&Arc<dyn MemoryStore>, ToolError> {
        self.memory
            .as_ref()
            .ok_or_else(|| missing_slot(ContextKey::Memory))
    }
}

fn missing_slot(key: ContextKey) -> ToolError {
    ToolError::invalid_argument(format!("Capability not injected: {}", key))
}

impl std::fmt::Debug for ToolInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled: Vec<ContextKey> = ContextKey::ALL
            .into_iter()
            .filter(|key| !self.args.contains_key(key.as_str()) && self.contains(*key))
            .collect();
        f.debug_struct("ToolInput")
            .field("args", &self.args)
            .field("injected", &filled)
            .finish()
    }
}
