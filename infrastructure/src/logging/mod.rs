//! Logging infrastructure: execution audit log.
//!
//! Provides [`JsonlExecutionLog`], a JSONL file writer that implements
//! the [`ExecutionSink`](dispatch_application::ExecutionSink) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlExecutionLog;
