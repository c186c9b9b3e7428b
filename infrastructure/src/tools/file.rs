//! File operation tools: read_file, write_file, list_dir

use dispatch_application::{ExecutionContext, Tool, ToolInput};
use dispatch_domain::{ContextKey, ToolDefinition, ToolError, ToolParameter, ToolTag};
use serde_json::{Value, json};

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const LIST_DIR: &str = "list_dir";

/// Resource group shared by every tool touching the filesystem
pub const FILESYSTEM_GROUP: &str = "filesystem";

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(READ_FILE, "Read the contents of a file at the specified path")
        .with_parameter(ToolParameter::new("path", "Path to the file to read", true).with_type("path"))
        .with_parameter(
            ToolParameter::new("offset", "Line number to start reading from (0-indexed)", false)
                .with_type("number"),
        )
        .with_parameter(
            ToolParameter::new("limit", "Maximum number of lines to read", false).with_type("number"),
        )
        .with_group(FILESYSTEM_GROUP)
        .with_tag(ToolTag::FileRead)
        .with_inject(ContextKey::FileSystem)
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file, creating it (and its parent directories) or overwriting it",
    )
    .with_parameter(ToolParameter::new("path", "Path to the file to write", true).with_type("path"))
    .with_parameter(
        ToolParameter::new("content", "Content to write to the file", true).with_type("string"),
    )
    .with_group(FILESYSTEM_GROUP)
    .with_tag(ToolTag::FileWrite)
    .with_inject(ContextKey::FileSystem)
    .with_inject(ContextKey::Logger)
}

pub fn list_dir_definition() -> ToolDefinition {
    ToolDefinition::new(LIST_DIR, "List the entries of a directory, sorted by name")
        .with_parameter(
            ToolParameter::new("path", "Directory to list (defaults to '.')", false).with_type("path"),
        )
        .with_group(FILESYSTEM_GROUP)
        .with_tag(ToolTag::FileRead)
        .with_inject(ContextKey::FileSystem)
}

pub fn read_file_tool() -> Tool {
    Tool::from_fn(read_file_definition(), execute_read_file)
}

pub fn write_file_tool() -> Tool {
    Tool::from_fn(write_file_definition(), execute_write_file)
}

pub fn list_dir_tool() -> Tool {
    Tool::from_fn(list_dir_definition(), execute_list_dir)
}

async fn execute_read_file(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let path = input.require_str("path")?;
    let content = input.require_file_system()?.read_to_string(path).await?;

    let offset = input.arg("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
    let limit = input.arg("limit").and_then(Value::as_u64).map(|l| l as usize);

    if offset == 0 && limit.is_none() {
        return Ok(Value::String(content));
    }

    let lines: Vec<&str> = content.lines().skip(offset).collect();
    let selected = match limit {
        Some(limit) => &lines[..limit.min(lines.len())],
        None => &lines[..],
    };
    Ok(Value::String(selected.join("\n")))
}

async fn execute_write_file(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let path = input.require_str("path")?;
    let content = input.require_str("content")?;

    input.require_file_system()?.write(path, content).await?;
    if let Some(logger) = &input.logger {
        logger.info(&format!("Wrote {} bytes to {}", content.len(), path));
    }

    Ok(json!({ "path": path, "bytes": content.len() }))
}

async fn execute_list_dir(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let path = input.str_arg("path").unwrap_or(".");
    let entries = input.require_file_system()?.list_dir(path).await?;
    Ok(json!(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::LocalFileSystem;
    use dispatch_application::{ContextOptions, ExecutionContextManager, ExecutionOptions, ToolExecutor};
    use serde_json::Map;
    use std::sync::Arc;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn ctx(root: &std::path::Path) -> ExecutionContext {
        ExecutionContextManager::new()
            .create(ContextOptions::new().with_file_system(Arc::new(LocalFileSystem::with_root(root))))
    }

    #[test]
    fn test_definitions() {
        let def = read_file_definition();
        assert_eq!(def.group.as_deref(), Some(FILESYSTEM_GROUP));
        assert_eq!(def.inject, vec![ContextKey::FileSystem]);
        assert!(def.parameters.iter().any(|p| p.name == "path" && p.required));

        let def = write_file_definition();
        assert!(def.has_tag(&ToolTag::FileWrite));
        assert_eq!(def.inject, vec![ContextKey::FileSystem, ContextKey::Logger]);
    }

    #[tokio::test]
    async fn test_write_then_read_through_executor() {
        let dir = tempfile::tempdir().unwrap();
        let context = ctx(dir.path());
        let executor = ToolExecutor::new();
        let options = ExecutionOptions::new();

        let written = executor
            .execute(
                &write_file_tool(),
                params(json!({"path": "a.txt", "content": "one\ntwo\nthree"})),
                &context,
                &options,
            )
            .await;
        assert!(written.success, "{:?}", written.error);
        assert_eq!(written.result, Some(json!({"path": "a.txt", "bytes": 13})));

        let read = executor
            .execute(
                &read_file_tool(),
                params(json!({"path": "a.txt", "offset": 1, "limit": 1})),
                &context,
                &options,
            )
            .await;
        assert_eq!(read.result, Some(json!("two")));
    }

    #[tokio::test]
    async fn test_missing_path_fails_without_retry() {
        let dir = tempfile::tempdir().unwrap();
        let result = ToolExecutor::new()
            .execute(&read_file_tool(), Map::new(), &ctx(dir.path()), &ExecutionOptions::new())
            .await;

        assert!(!result.success);
        assert_eq!(result.attempts, 1);
        assert!(result.error.unwrap().contains("Missing required parameter: path"));
    }

    #[tokio::test]
    async fn test_list_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("z.txt"), "").unwrap();
        std::fs::write(dir.path().join("m.txt"), "").unwrap();

        let result = ToolExecutor::new()
            .execute(&list_dir_tool(), Map::new(), &ctx(dir.path()), &ExecutionOptions::new())
            .await;
        assert_eq!(result.result, Some(json!(["m.txt", "z.txt"])));
    }

    #[tokio::test]
    async fn test_without_file_system_is_missing_context() {
        let result = ToolExecutor::new()
            .execute(
                &read_file_tool(),
                params(json!({"path": "a.txt"})),
                &ExecutionContext::default(),
                &ExecutionOptions::new(),
            )
            .await;

        assert_eq!(result.attempts, 0);
        assert_eq!(result.error_kind, Some(dispatch_domain::ErrorKind::MissingContext));
    }
}
