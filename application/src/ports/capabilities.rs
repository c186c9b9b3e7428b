//! Capability ports
//!
//! The ambient capabilities an [`ExecutionContext`](crate::context::ExecutionContext)
//! can carry. Each is a trait object so tools stay independent of the
//! concrete filesystem, browser transport, model client or storage backend.
//! Adapters live in the infrastructure layer (or in test modules as mocks).

use async_trait::async_trait;
use dispatch_domain::ToolError;
use serde_json::Value;

/// Filesystem access for file tools.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn read_to_string(&self, path: &str) -> Result<String, ToolError>;

    async fn write(&self, path: &str, contents: &str) -> Result<(), ToolError>;

    /// Entry names of a directory, sorted.
    async fn list_dir(&self, path: &str) -> Result<Vec<String>, ToolError>;

    async fn exists(&self, path: &str) -> bool;
}

/// Handle on the remote-controlled browser session.
///
/// Only the current-URL accessor is needed by the dispatcher itself (domain
/// checks); browser tools use their own richer handles.
pub trait BrowserSession: Send + Sync {
    fn current_url(&self) -> Option<String>;
}

/// Minimal model client for tools that call an LLM themselves.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ToolError>;
}

/// Opaque key/value memory store.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn save(&self, key: &str, value: Value) -> Result<(), ToolError>;

    async fn get(&self, key: &str) -> Result<Option<Value>, ToolError>;

    /// Entries whose key contains `query`, in key order.
    async fn search(&self, query: &str) -> Result<Vec<(String, Value)>, ToolError>;
}
