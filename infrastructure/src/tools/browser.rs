//! Browser tools that only need the current page.

use dispatch_application::{ExecutionContext, Tool, ToolInput};
use dispatch_domain::{ContextKey, ToolDefinition, ToolError, ToolTag};
use serde_json::{Value, json};

pub const BROWSER_CURRENT_URL: &str = "browser_current_url";

pub const BROWSER_GROUP: &str = "browser";

pub fn browser_current_url_tool() -> Tool {
    let definition = ToolDefinition::new(BROWSER_CURRENT_URL, "Report the URL of the current page")
        .with_group(BROWSER_GROUP)
        .with_tag(ToolTag::BrowserGetContent)
        .with_inject(ContextKey::Browser);

    Tool::from_fn(definition, execute_current_url)
}

async fn execute_current_url(input: ToolInput, _context: ExecutionContext) -> Result<Value, ToolError> {
    let url = input.require_browser()?.current_url();
    Ok(json!({ "url": url.map(Value::String).unwrap_or(Value::Null) }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::FixedUrlBrowser;
    use dispatch_application::{ContextOptions, ExecutionContextManager, ExecutionOptions, ToolExecutor};
    use serde_json::Map;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reports_current_url() {
        let browser = Arc::new(FixedUrlBrowser::new(Some("https://github.com/x".to_string())));
        let context = ExecutionContextManager::new().create(ContextOptions::new().with_browser(browser));

        let result = ToolExecutor::new()
            .execute(&browser_current_url_tool(), Map::new(), &context, &ExecutionOptions::new())
            .await;
        assert_eq!(result.result, Some(json!({"url": "https://github.com/x"})));
    }
}
