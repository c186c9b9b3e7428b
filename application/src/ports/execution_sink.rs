//! Port for forwarding completed executions.
//!
//! The scheduler hands every [`ExecutionResult`] it produces to an
//! [`ExecutionSink`]. Typical sinks are the JSONL audit log and the CLI
//! progress display.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while a sink receives the full result in its
//! replayable shape.

use dispatch_domain::ExecutionResult;
use std::sync::Arc;

/// Receiver of completed execution results.
///
/// `on_result` is synchronous and non-fallible so a slow or broken sink never
/// changes the outcome of a dispatch. Implementations swallow their own errors.
pub trait ExecutionSink: Send + Sync {
    fn on_result(&self, result: &ExecutionResult);
}

/// No-op implementation for tests and when nothing is listening.
pub struct NoExecutionSink;

impl ExecutionSink for NoExecutionSink {
    fn on_result(&self, _result: &ExecutionResult) {}
}

/// Fan-out to several sinks in order.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn ExecutionSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ExecutionSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ExecutionSink for CompositeSink {
    fn on_result(&self, result: &ExecutionResult) {
        for sink in &self.sinks {
            sink.on_result(result);
        }
    }
}
