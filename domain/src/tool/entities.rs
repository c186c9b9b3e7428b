//! Tool domain entities

use crate::context::ContextKey;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Capability label used for tag-based tool lookup.
///
/// Well-known labels follow a `category:action` form. Anything else is kept
/// verbatim as [`ToolTag::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ToolTag {
    FileRead,
    FileWrite,
    FileEdit,
    FileDelete,
    WebSearch,
    WebFetch,
    WebScrape,
    BrowserNavigate,
    BrowserClick,
    BrowserFill,
    BrowserScreenshot,
    BrowserGetContent,
    RuntimeExec,
    RuntimeProcess,
    MemorySave,
    MemorySearch,
    MemoryGet,
    UiNotification,
    UiCanvas,
    AutomationCron,
    AutomationGateway,
    Custom(String),
}

impl ToolTag {
    const KNOWN: [ToolTag; 21] = [
        ToolTag::FileRead,
        ToolTag::FileWrite,
        ToolTag::FileEdit,
        ToolTag::FileDelete,
        ToolTag::WebSearch,
        ToolTag::WebFetch,
        ToolTag::WebScrape,
        ToolTag::BrowserNavigate,
        ToolTag::BrowserClick,
        ToolTag::BrowserFill,
        ToolTag::BrowserScreenshot,
        ToolTag::BrowserGetContent,
        ToolTag::RuntimeExec,
        ToolTag::RuntimeProcess,
        ToolTag::MemorySave,
        ToolTag::MemorySearch,
        ToolTag::MemoryGet,
        ToolTag::UiNotification,
        ToolTag::UiCanvas,
        ToolTag::AutomationCron,
        ToolTag::AutomationGateway,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ToolTag::FileRead => "file:read",
            ToolTag::FileWrite => "file:write",
            ToolTag::FileEdit => "file:edit",
            ToolTag::FileDelete => "file:delete",
            ToolTag::WebSearch => "web:search",
            ToolTag::WebFetch => "web:fetch",
            ToolTag::WebScrape => "web:scrape",
            ToolTag::BrowserNavigate => "browser:navigate",
            ToolTag::BrowserClick => "browser:click",
            ToolTag::BrowserFill => "browser:fill",
            ToolTag::BrowserScreenshot => "browser:screenshot",
            ToolTag::BrowserGetContent => "browser:get_content",
            ToolTag::RuntimeExec => "runtime:exec",
            ToolTag::RuntimeProcess => "runtime:process",
            ToolTag::MemorySave => "memory:save",
            ToolTag::MemorySearch => "memory:search",
            ToolTag::MemoryGet => "memory:get",
            ToolTag::UiNotification => "ui:notification",
            ToolTag::UiCanvas => "ui:canvas",
            ToolTag::AutomationCron => "automation:cron",
            ToolTag::AutomationGateway => "automation:gateway",
            ToolTag::Custom(s) => s,
        }
    }

    pub fn custom(label: impl Into<String>) -> Self {
        Self::from(label.into())
    }
}

impl std::fmt::Display for ToolTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ToolTag {
    fn from(s: String) -> Self {
        ToolTag::KNOWN
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .unwrap_or(ToolTag::Custom(s))
    }
}

impl From<&str> for ToolTag {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ToolTag> for String {
    fn from(tag: ToolTag) -> Self {
        tag.as_str().to_string()
    }
}

impl FromStr for ToolTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Definition of a tool: everything the dispatcher needs to know about it
/// except the code that runs it.
///
/// Immutable once registered; the registry hands out shared references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "browser_click")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    /// Resource group; tools sharing a group never run concurrently.
    /// `None` means the scheduler's default group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Capability labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ToolTag>,
    /// Host patterns the browser must be on for the tool to run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
    /// Per-tool timeout overriding the host default
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "duration_ms_opt"
    )]
    pub timeout: Option<Duration>,
    /// Context capabilities injected into the call parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inject: Vec<ContextKey>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "path", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            group: None,
            tags: Vec::new(),
            domains: Vec::new(),
            timeout: None,
            inject: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<ToolTag>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn with_domain(mut self, pattern: impl Into<String>) -> Self {
        self.domains.push(pattern.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_inject(mut self, key: ContextKey) -> Self {
        if !self.inject.contains(&key) {
            self.inject.push(key);
        }
        self
    }

    pub fn has_tag(&self, tag: &ToolTag) -> bool {
        self.tags.contains(tag)
    }

    /// Group this tool runs in, falling back to `default_group`.
    pub fn group_or<'a>(&'a self, default_group: &'a str) -> &'a str {
        self.group.as_deref().unwrap_or(default_group)
    }

    /// Provider-neutral JSON Schema for the planner.
    ///
    /// `param_type` mapping: `string`/`path` → `string`, `number`, `integer`,
    /// `boolean`, `object`, `array`; anything else → `string`.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                "object" => "object",
                "array" => "array",
                _ => "string",
            };

            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

mod duration_ms_opt {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_u64(d.as_millis() as u64),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new("browser_click", "Click an element")
            .with_group("browser")
            .with_tag(ToolTag::BrowserClick)
            .with_tag(ToolTag::BrowserClick)
            .with_domain("*.allowed.com")
            .with_inject(ContextKey::Browser)
            .with_timeout(Duration::from_secs(5))
            .with_parameter(ToolParameter::new("selector", "CSS selector", true));

        assert_eq!(tool.name, "browser_click");
        assert_eq!(tool.group.as_deref(), Some("browser"));
        assert_eq!(tool.tags.len(), 1);
        assert!(tool.has_tag(&ToolTag::BrowserClick));
        assert_eq!(tool.inject, vec![ContextKey::Browser]);
        assert_eq!(tool.group_or("default"), "browser");
    }

    #[test]
    fn test_group_fallback() {
        let tool = ToolDefinition::new("read_file", "Read a file");
        assert_eq!(tool.group_or("default"), "default");
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(ToolTag::from("file:read"), ToolTag::FileRead);
        assert_eq!(ToolTag::from("browser:get_content"), ToolTag::BrowserGetContent);
        assert_eq!(
            ToolTag::from("team:internal"),
            ToolTag::Custom("team:internal".to_string())
        );
        assert_eq!(ToolTag::custom("memory:get"), ToolTag::MemoryGet);
    }

    #[test]
    fn test_tag_serde_as_string() {
        let json = serde_json::to_string(&vec![ToolTag::WebFetch, ToolTag::custom("x")]).unwrap();
        assert_eq!(json, r#"["web:fetch","x"]"#);
        let tags: Vec<ToolTag> = serde_json::from_str(&json).unwrap();
        assert_eq!(tags[0], ToolTag::WebFetch);
    }

    #[test]
    fn test_definition_serde_timeout_in_millis() {
        let tool = ToolDefinition::new("slow", "Slow tool").with_timeout(Duration::from_millis(1500));
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["timeout"], 1500);

        let parsed: ToolDefinition =
            serde_json::from_str(r#"{"name":"t","description":"d","inject":["browser"]}"#).unwrap();
        assert!(parsed.timeout.is_none());
        assert_eq!(parsed.inject, vec![ContextKey::Browser]);
    }

    #[test]
    fn test_json_schema() {
        let tool = ToolDefinition::new("read_file", "Read a file")
            .with_parameter(ToolParameter::new("path", "File path", true).with_type("path"))
            .with_parameter(ToolParameter::new("limit", "Max lines", false).with_type("integer"));

        let schema = tool.to_json_schema();
        assert_eq!(schema["name"], "read_file");
        assert_eq!(schema["input_schema"]["properties"]["path"]["type"], "string");
        assert_eq!(schema["input_schema"]["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["input_schema"]["required"], serde_json::json!(["path"]));
    }
}
