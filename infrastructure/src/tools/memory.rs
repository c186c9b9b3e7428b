//! Memory tools: memory_save, memory_get, memory_search

use dispatch_application::{ExecutionContext, Tool, ToolInput};
use dispatch_domain::{ContextKey, ToolDefinition, ToolError, ToolParameter, ToolTag};
use serde_json::{Value, json};

pub const MEMORY_SAVE: &str = "memory_save";
pub const MEMORY_GET: &str = "memory_get";
pub const MEMORY_SEARCH: &str = "memory_search";

pub const MEMORY_GROUP: &str = "memory";

fn memory_definition(name: &str, description: &str, tag: ToolTag) -> ToolDefinition {
    ToolDefinition::new(name, description)
        .with_group(MEMORY_GROUP)
        .with_tag(tag)
        .with_inject(ContextKey::Memory)
}

pub fn memory_save_tool() -> Tool {
    let definition = memory_definition(MEMORY_SAVE, "Store a JSON value under a key", ToolTag::MemorySave)
        .with_parameter(ToolParameter::new("key", "Key to store under", true).with_type("string"))
        .with_parameter(ToolParameter::new("value", "Any JSON value", true).with_type("any"));

    Tool::from_fn(definition, execute_memory_save)
}

pub fn memory_get_tool() -> Tool {
    let definition = memory_definition(MEMORY_GET, "Fetch the value stored under a key", ToolTag::MemoryGet)
        .with_parameter(ToolParameter::new("key", "Key to look up", true).with_type("string"));

    Tool::from_fn(definition, execute_memory_get)
}

pub fn memory_search_tool() -> Tool {
    let definition = memory_definition(
        MEMORY_SEARCH,
        "List stored entries whose key contains the query",
        ToolTag::MemorySearch,
    )
    .with_parameter(ToolParameter::new("query", "Substring to look for in keys", true).with_type("string"));

    Tool::from_fn(definition, execute_memory_search)
}

async fn execute_memory_save(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let key = input.require_str("key")?;
    let value = input
        .arg("value")
        .cloned()
        .ok_or_else(|| ToolError::invalid_argument("Missing required parameter: value"))?;
    input.require_memory()?.save(key, value).await?;
    Ok(json!({ "saved": key }))
}

async fn execute_memory_get(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let key = input.require_str("key")?;
    let value = input.require_memory()?.get(key).await?;
    Ok(value.unwrap_or(Value::Null))
}

async fn execute_memory_search(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let query = input.require_str("query")?;
    let entries = input.require_memory()?.search(query).await?;
    Ok(Value::Array(
        entries
            .into_iter()
            .map(|(key, value)| json!({ "key": key, "value": value }))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::InMemoryMemoryStore;
    use dispatch_application::{ContextOptions, ExecutionContextManager, ExecutionOptions, ToolExecutor};
    use serde_json::Map;
    use std::sync::Arc;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_save_get_search() {
        let context = ExecutionContextManager::new()
            .create(ContextOptions::new().with_memory(Arc::new(InMemoryMemoryStore::new())));
        let executor = ToolExecutor::new();
        let options = ExecutionOptions::new();

        let saved = executor
            .execute(&memory_save_tool(), params(json!({"key": "lang", "value": {"name": "rust"}})), &context, &options)
            .await;
        assert_eq!(saved.result, Some(json!({"saved": "lang"})));

        let got = executor
            .execute(&memory_get_tool(), params(json!({"key": "lang"})), &context, &options)
            .await;
        assert_eq!(got.result, Some(json!({"name": "rust"})));

        let missing = executor
            .execute(&memory_get_tool(), params(json!({"key": "nope"})), &context, &options)
            .await;
        assert_eq!(missing.result, Some(Value::Null));

        let found = executor
            .execute(&memory_search_tool(), params(json!({"query": "la"})), &context, &options)
            .await;
        assert_eq!(found.result, Some(json!([{"key": "lang", "value": {"name": "rust"}}])));
    }
}
