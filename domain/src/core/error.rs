//! Dispatch error taxonomy

use crate::context::ContextKey;
use crate::tool::value_objects::ToolError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while registering or dispatching tools.
///
/// | Kind | Raised by | Retryable? | Tool invoked? |
/// |------|-----------|-----------|---------------|
/// | `DuplicateTool` | registry | - | - |
/// | `DomainNotAllowed` | executor | No | Never |
/// | `MissingContext` | executor | No | Never |
/// | `ExecutionTimeout` | executor | Yes | Yes |
/// | `ExecutionFailed` | executor | Yes | Yes |
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    #[error("Tool \"{name}\" is already registered")]
    DuplicateTool { name: String },

    #[error("Tool not allowed on domain: {tool} (current domain: {domain})")]
    DomainNotAllowed {
        tool: String,
        domain: String,
        allowed: Vec<String>,
    },

    #[error("Tool requires context: {tool} (missing: {})", join_keys(.missing))]
    MissingContext {
        tool: String,
        missing: Vec<ContextKey>,
    },

    #[error("Tool execution timeout: {tool} after {timeout_ms}ms")]
    ExecutionTimeout { tool: String, timeout_ms: u64 },

    #[error("Tool execution failed: {tool}: {source}")]
    ExecutionFailed {
        tool: String,
        #[source]
        source: ToolError,
    },
}

fn join_keys(keys: &[ContextKey]) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::DuplicateTool { .. } => ErrorKind::DuplicateTool,
            DispatchError::DomainNotAllowed { .. } => ErrorKind::DomainNotAllowed,
            DispatchError::MissingContext { .. } => ErrorKind::MissingContext,
            DispatchError::ExecutionTimeout { .. } => ErrorKind::ExecutionTimeout,
            DispatchError::ExecutionFailed { .. } => ErrorKind::ExecutionFailed,
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Message surfaced in an execution result.
    ///
    /// A failing tool's own message is passed through unchanged; every other
    /// kind uses its display form.
    pub fn surface_message(&self) -> String {
        match self {
            DispatchError::ExecutionFailed { source, .. } => source.message.clone(),
            other => other.to_string(),
        }
    }
}

/// Serializable discriminant of [`DispatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DuplicateTool,
    DomainNotAllowed,
    MissingContext,
    ExecutionTimeout,
    ExecutionFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateTool => "duplicate_tool",
            ErrorKind::DomainNotAllowed => "domain_not_allowed",
            ErrorKind::MissingContext => "missing_context",
            ErrorKind::ExecutionTimeout => "execution_timeout",
            ErrorKind::ExecutionFailed => "execution_failed",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::ExecutionTimeout | ErrorKind::ExecutionFailed)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
