//! Tool Executor
//!
//! Runs one tool invocation end to end. The phases are strictly sequential
//! and only the last one is ever retried:
//!
//! | # | Phase | On failure | Tool invoked? |
//! |---|-------|-----------|---------------|
//! | 1 | Domain check (restricted tools only) | `DomainNotAllowed`, no retry | No |
//! | 2 | Dependency validation | `MissingContext`, no retry | No |
//! | 3 | Parameter injection | - | No |
//! | 4 | Timed attempts | `ExecutionTimeout` / `ExecutionFailed`, retried | Yes |
//! | 5 | Result packaging | - | - |
//!
//! Every entry point returns an [`ExecutionResult`]; nothing here fails with
//! `Err`.
//!
//! # Timeouts
//!
//! A timeout only stops the executor from waiting: the timed-out future is
//! dropped at its next suspension point. Work the tool already handed to an
//! external system is not cancelled.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dispatch_domain::{DispatchError, ExecutionResult, ToolCallRecord, ToolError};
use futures::FutureExt;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::DispatchConfig;
use crate::context::ExecutionContext;
use crate::domain_guard::DomainGuard;
use crate::injector::ParamInjector;
use crate::tool::Tool;

/// Per-call execution options.
///
/// Unset fields fall back to the tool's own settings, then to the host
/// configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOptions {
    /// Overrides the tool's timeout and the host default
    pub timeout: Option<Duration>,
    /// Extra attempts after the first one
    pub retries: u32,
    /// Wait between attempts
    pub retry_delay: Option<Duration>,
}

impl ExecutionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }
}

/// One entry of a batch: a tool and its caller-supplied parameters.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub tool: Arc<Tool>,
    pub params: Map<String, Value>,
}

impl BatchItem {
    pub fn new(tool: Arc<Tool>, params: Map<String, Value>) -> Self {
        Self { tool, params }
    }
}

/// Single-invocation executor with timeout, retry and domain guard.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    injector: ParamInjector,
    guard: DomainGuard,
    default_timeout: Duration,
    default_retry_delay: Duration,
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}

impl ToolExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            injector: ParamInjector::new(),
            guard: DomainGuard::new(),
            default_timeout: config.default_timeout,
            default_retry_delay: config.default_retry_delay,
        }
    }

    /// Timeout applied to each attempt: options, then tool, then host default.
    pub fn effective_timeout(&self, tool: &Tool, options: &ExecutionOptions) -> Duration {
        options
            .timeout
            .or(tool.definition().timeout)
            .unwrap_or(self.default_timeout)
    }

    /// Run one tool invocation.
    pub async fn execute(
        &self,
        tool: &Tool,
        params: Map<String, Value>,
        context: &ExecutionContext,
        options: &ExecutionOptions,
    ) -> ExecutionResult {
        let start = Instant::now();
        let definition = tool.definition();
        let mut record = ToolCallRecord::new(&definition.name, params.clone());
        debug!(tool = %definition.name, call_id = %record.id, "Dispatching tool");

        if let Err(e) = self.guard.validate(definition, context) {
            warn!(tool = %definition.name, call_id = %record.id, error = %e, "Tool refused");
            return ExecutionResult::failure(record, &e, elapsed_ms(start), 0);
        }

        let check = self.injector.validate(definition, context);
        if !check.valid {
            let e = DispatchError::MissingContext {
                tool: definition.name.clone(),
                missing: check.missing,
            };
            warn!(tool = %definition.name, call_id = %record.id, error = %e, "Tool refused");
            return ExecutionResult::failure(record, &e, elapsed_ms(start), 0);
        }

        let (input, injected) = self.injector.inject(params, context, definition);
        record = record.with_injected(injected);

        let timeout = self.effective_timeout(tool, options);
        let max_attempts = options.retries.saturating_add(1);
        let retry_delay = options.retry_delay.unwrap_or(self.default_retry_delay);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                tool = %definition.name,
                call_id = %record.id,
                attempt,
                max_attempts,
                "Running attempt"
            );

            let attempt_future =
                AssertUnwindSafe(tool.handler().execute(input.clone(), context)).catch_unwind();
            let outcome = match tokio::time::timeout(timeout, attempt_future).await {
                Ok(Ok(Ok(value))) => Ok(value),
                Ok(Ok(Err(source))) => Err(DispatchError::ExecutionFailed {
                    tool: definition.name.clone(),
                    source,
                }),
                Ok(Err(payload)) => Err(DispatchError::ExecutionFailed {
                    tool: definition.name.clone(),
                    source: ToolError::execution_failed(format!(
                        "Tool panicked: {}",
                        panic_message(payload.as_ref())
                    )),
                }),
                Err(_) => Err(DispatchError::ExecutionTimeout {
                    tool: definition.name.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                }),
            };

            match outcome {
                Ok(value) => {
                    let duration_ms = elapsed_ms(start);
                    info!(
                        tool = %definition.name,
                        call_id = %record.id,
                        attempts = attempt,
                        duration_ms,
                        "Tool succeeded"
                    );
                    return ExecutionResult::success(record, value, duration_ms, attempt);
                }
                Err(e) => {
                    warn!(
                        tool = %definition.name,
                        call_id = %record.id,
                        attempt,
                        error = %e,
                        "Attempt failed"
                    );
                    if attempt >= max_attempts || !e.is_retryable() {
                        let duration_ms = elapsed_ms(start);
                        info!(
                            tool = %definition.name,
                            call_id = %record.id,
                            attempts = attempt,
                            duration_ms,
                            "Tool failed"
                        );
                        return ExecutionResult::failure(record, &e, duration_ms, attempt);
                    }
                    if !retry_delay.is_zero() {
                        tokio::time::sleep(retry_delay).await;
                    }
                }
            }
        }
    }

    /// Run items one after another, in list order.
    ///
    /// Failures are isolated: every item yields its own result.
    pub async fn execute_batch(
        &self,
        items: Vec<BatchItem>,
        context: &ExecutionContext,
        options: &ExecutionOptions,
    ) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(self.execute(&item.tool, item.params, context, options).await);
        }
        results
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
