//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod capabilities;
pub mod execution_sink;

pub use capabilities::{BrowserSession, FileSystem, LlmClient, MemoryStore};
pub use execution_sink::{CompositeSink, ExecutionSink, NoExecutionSink};
