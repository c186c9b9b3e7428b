//! Domain layer for tool-dispatch
//!
//! This crate contains the data the dispatcher moves around: tool
//! definitions, context capability names, policies, call records, execution
//! results and the error taxonomy. It has no dependencies on the async
//! runtime, infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Resource groups
//!
//! Every tool belongs to a group (explicit or the host's default). Tools in
//! the same group model one shared stateful resource, such as a browser tab,
//! and are never run concurrently by the scheduler.
//!
//! ## Injection contract
//!
//! A tool lists the [`ContextKey`]s it needs. Missing capabilities are a hard,
//! non-retryable failure detected before the tool is touched.

pub mod config;
pub mod context;
pub mod core;
pub mod policy;
pub mod tool;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use context::ContextKey;
pub use core::error::{DispatchError, ErrorKind};
pub use policy::{DomainPattern, ToolPolicy};
pub use tool::{
    entities::{ToolDefinition, ToolParameter, ToolTag},
    value_objects::{ExecutionResult, ToolCallRecord, ToolError, generate_call_id},
};
