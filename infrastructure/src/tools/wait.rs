//! `wait`: sleep for a while, for exercising timeouts and scheduling.

use dispatch_application::{ExecutionContext, Tool, ToolInput};
use dispatch_domain::{ToolDefinition, ToolError, ToolParameter, ToolTag};
use serde_json::{Value, json};
use std::time::Duration;

pub const WAIT: &str = "wait";

/// Upper bound on a single wait (1 minute)
const MAX_WAIT_MS: u64 = 60_000;

pub fn wait_tool() -> Tool {
    let definition = ToolDefinition::new(WAIT, "Sleep for the given number of milliseconds")
        .with_parameter(ToolParameter::new("ms", "Milliseconds to sleep", true).with_type("number"))
        .with_parameter(
            ToolParameter::new("fail", "Fail with this message after sleeping", false).with_type("string"),
        )
        .with_tag(ToolTag::custom("util:wait"));

    Tool::from_fn(definition, execute_wait)
}

async fn execute_wait(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let ms = input
        .arg("ms")
        .and_then(Value::as_u64)
        .ok_or_else(|| ToolError::invalid_argument("Missing required parameter: ms"))?;
    if ms > MAX_WAIT_MS {
        return Err(ToolError::invalid_argument(format!(
            "ms must be at most {}",
            MAX_WAIT_MS
        )));
    }

    tokio::time::sleep(Duration::from_millis(ms)).await;

    match input.str_arg("fail") {
        Some(message) => Err(ToolError::execution_failed(message)),
        None => Ok(json!({ "slept_ms": ms })),
    }
}
