//! Tool domain module
//!
//! Pure descriptions of tools and of what happens when one is dispatched.
//! Nothing here performs I/O; handlers and the dispatch pipeline live in the
//! application layer.
//!
//! ```text
//! ┌────────────────┐    ┌────────────────┐    ┌─────────────────┐
//! │ ToolDefinition │───▶│ ToolCallRecord │───▶│ ExecutionResult │
//! │ (registry)     │    │ (one per call) │    │ (outcome)       │
//! └────────────────┘    └────────────────┘    └─────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`] — name, parameter schema, group, tags, domains,
//!   timeout and injection contract
//! - [`ToolTag`] — capability label for tag-based lookup
//! - [`ToolCallRecord`] — audit record shared by every retry of one call
//! - [`ExecutionResult`] — success flag, payload or error, duration, attempts
//! - [`ToolError`] — failure reported by a tool handler

pub mod entities;
pub mod value_objects;

pub use entities::{ToolDefinition, ToolParameter, ToolTag};
pub use value_objects::{ExecutionResult, ToolCallRecord, ToolError, generate_call_id};
