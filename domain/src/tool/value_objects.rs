//! Tool domain value objects: errors, call records and execution results
//!
//! These types form the **output side** of a dispatch. Every call that goes
//! through the executor produces exactly one [`ExecutionResult`] carrying a
//! [`ToolCallRecord`], whether the tool ran or was rejected up front.

use crate::context::ContextKey;
use crate::core::error::{DispatchError, ErrorKind};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error reported by a tool handler.
///
/// | Code | Typical cause |
/// |------|---------------|
/// | `INVALID_ARGUMENT` | Missing or malformed parameter |
/// | `NOT_FOUND` | File, key or resource absent |
/// | `PERMISSION_DENIED` | Access refused by the capability |
/// | `EXECUTION_FAILED` | Any other runtime failure |
/// | `TIMEOUT` | The tool gave up waiting on something itself |
///
/// The dispatcher treats every code the same way: the failure is wrapped in
/// [`DispatchError::ExecutionFailed`] and is retryable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "PERMISSION_DENIED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn permission_denied(resource: impl Into<String>) -> Self {
        Self::new(
            "PERMISSION_DENIED",
            format!("Permission denied: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ToolError::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => ToolError::permission_denied(err.to_string()),
            _ => ToolError::execution_failed(err.to_string()),
        }
    }
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mint a call id of the form `call_<unixMillis>_<9 base36 chars>`.
pub fn generate_call_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("call_{}_{}", chrono::Utc::now().timestamp_millis(), suffix)
}

/// Audit record of one logical tool call (shared by all its retry attempts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    /// Argument map after injection. Capability handles are not serialisable,
    /// so injected keys are listed in [`injected`](Self::injected) instead.
    pub parameters: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub injected: Vec<ContextKey>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolCallRecord {
    pub fn new(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            id: generate_call_id(),
            name: name.into(),
            parameters,
            injected: Vec::new(),
            success: false,
            error: None,
        }
    }

    pub fn with_injected(mut self, injected: Vec<ContextKey>) -> Self {
        self.injected = injected;
        self
    }
}

/// Outcome of one tool invocation attempt sequence.
///
/// `success` here and in [`tool_call`](Self::tool_call) always agree; both
/// constructors set them together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Wall-clock time of the whole attempt sequence, retry delays included
    pub duration_ms: u64,
    /// Number of times the tool was actually invoked
    pub attempts: u32,
    pub tool_call: ToolCallRecord,
}

impl ExecutionResult {
    pub fn success(
        mut tool_call: ToolCallRecord,
        result: Value,
        duration_ms: u64,
        attempts: u32,
    ) -> Self {
        tool_call.success = true;
        tool_call.error = None;
        Self {
            success: true,
            result: Some(result),
            error: None,
            error_kind: None,
            duration_ms,
            attempts,
            tool_call,
        }
    }

    pub fn failure(
        mut tool_call: ToolCallRecord,
        error: &DispatchError,
        duration_ms: u64,
        attempts: u32,
    ) -> Self {
        let message = error.surface_message();
        tool_call.success = false;
        tool_call.error = Some(message.clone());
        Self {
            success: false,
            result: None,
            error: Some(message),
            error_kind: Some(error.kind()),
            duration_ms,
            attempts,
            tool_call,
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_call.name
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}
