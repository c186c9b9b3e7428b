//! Tool Registry
//!
//! The [`ToolRegistry`] owns every registered [`Tool`] and keeps two indexes
//! over them: tag → tool names and resource group → tool names. Both indexes
//! preserve registration order and are pruned when they become empty, so
//! [`get_groups`](ToolRegistry::get_groups) and tag queries never report dead
//! labels.
//!
//! # Usage
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register(read_file_tool)?;
//! registry.register(browser_click_tool)?;
//!
//! let browser_tools = registry.find_tools_by_tag(&[ToolTag::BrowserClick]);
//! let visible = registry.filter_tools(&ToolPolicy::new().with_deny(["runtime_*"]));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use dispatch_domain::{DispatchError, ToolPolicy, ToolTag};

use crate::config::DEFAULT_GROUP;
use crate::tool::Tool;

/// Registry of runnable tools.
#[derive(Debug)]
pub struct ToolRegistry {
    /// Tool name -> tool
    tools: HashMap<String, Arc<Tool>>,
    /// Registration order
    order: Vec<String>,
    /// Tag -> tool names, registration order
    tag_index: HashMap<ToolTag, Vec<String>>,
    /// Group -> tool names, groups in first-seen order
    group_index: Vec<(String, Vec<String>)>,
    default_group: String,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::with_default_group(DEFAULT_GROUP)
    }

    pub fn with_default_group(default_group: impl Into<String>) -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            tag_index: HashMap::new(),
            group_index: Vec::new(),
            default_group: default_group.into(),
        }
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Register a tool, indexing it by every tag and by its group.
    pub fn register(&mut self, tool: Tool) -> Result<Arc<Tool>, DispatchError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(DispatchError::DuplicateTool { name });
        }

        let tool = Arc::new(tool);
        for tag in &tool.definition().tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .push(name.clone());
        }

        let group = tool.definition().group_or(&self.default_group).to_string();
        match self.group_index.iter_mut().find(|(g, _)| *g == group) {
            Some((_, names)) => names.push(name.clone()),
            None => self.group_index.push((group.clone(), vec![name.clone()])),
        }

        tracing::debug!(tool = %name, group = %group, "Registered tool");
        self.order.push(name.clone());
        self.tools.insert(name, tool.clone());
        Ok(tool)
    }

    /// Register several tools, stopping at the first duplicate.
    ///
    /// Tools registered before the duplicate stay registered.
    pub fn register_batch(
        &mut self,
        tools: impl IntoIterator<Item = Tool>,
    ) -> Result<(), DispatchError> {
        for tool in tools {
            self.register(tool)?;
        }
        Ok(())
    }

    /// Remove a tool and prune index entries that become empty.
    ///
    /// Returns `false` when no tool had that name.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(tool) = self.tools.remove(name) else {
            return false;
        };
        self.order.retain(|n| n != name);

        for tag in &tool.definition().tags {
            if let Some(names) = self.tag_index.get_mut(tag) {
                names.retain(|n| n != name);
                if names.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }

        let group = tool.definition().group_or(&self.default_group);
        if let Some(pos) = self.group_index.iter().position(|(g, _)| g == group) {
            let names = &mut self.group_index[pos].1;
            names.retain(|n| n != name);
            if names.is_empty() {
                self.group_index.remove(pos);
            }
        }

        tracing::debug!(tool = %name, "Unregistered tool");
        true
    }

    pub fn get_tool(&self, name: &str) -> Option<Arc<Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tools in registration order.
    pub fn get_tools(&self) -> Vec<Arc<Tool>> {
        self.collect(&self.order)
    }

    /// Tools carrying every listed tag, in registration order.
    ///
    /// No tags means every tool.
    pub fn find_tools_by_tag(&self, tags: &[ToolTag]) -> Vec<Arc<Tool>> {
        let Some((first, rest)) = tags.split_first() else {
            return self.get_tools();
        };
        let Some(candidates) = self.tag_index.get(first) else {
            return Vec::new();
        };

        candidates
            .iter()
            .filter(|name| {
                rest.iter().all(|tag| {
                    self.tag_index
                        .get(tag)
                        .is_some_and(|names| names.contains(name))
                })
            })
            .filter_map(|name| self.tools.get(name).cloned())
            .collect()
    }

    /// Tools in `group`, in registration order. Unknown group yields nothing.
    pub fn get_group(&self, group: &str) -> Vec<Arc<Tool>> {
        self.group_index
            .iter()
            .find(|(g, _)| g == group)
            .map(|(_, names)| self.collect(names))
            .unwrap_or_default()
    }

    /// Names of every group that currently has at least one tool.
    pub fn get_groups(&self) -> Vec<String> {
        self.group_index.iter().map(|(g, _)| g.clone()).collect()
    }

    /// Every tag that currently has at least one tool.
    pub fn get_tags(&self) -> Vec<ToolTag> {
        let mut tags: Vec<ToolTag> = self.tag_index.keys().cloned().collect();
        tags.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        tags
    }

    /// Tools visible under `policy`, in registration order.
    pub fn filter_tools(&self, policy: &ToolPolicy) -> Vec<Arc<Tool>> {
        self.order
            .iter()
            .filter(|name| policy.is_allowed(name))
            .filter_map(|name| self.tools.get(name).cloned())
            .collect()
    }

    /// Whether `name` passes `policy`. Deny wins over allow.
    ///
    /// The name does not have to be registered.
    pub fn is_tool_allowed(&self, name: &str, policy: &ToolPolicy) -> bool {
        policy.is_allowed(name)
    }

    /// JSON Schema of every tool, in registration order.
    pub fn schemas(&self) -> Vec<serde_json::Value> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition().to_json_schema())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Remove every tool and index entry.
    pub fn clear(&mut self) {
        self.tools.clear();
        self.order.clear();
        self.tag_index.clear();
        self.group_index.clear();
    }

    fn collect(&self, names: &[String]) -> Vec<Arc<Tool>> {
        names
            .iter()
            .filter_map(|name| self.tools.get(name).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchConfig;
    use dispatch_domain::{ErrorKind, ToolDefinition};
    use serde_json::json;

    fn tool(def: ToolDefinition) -> Tool {
        Tool::from_fn(def, |_input, _ctx| async { Ok(json!(null)) })
    }

    fn names(tools: &[Arc<Tool>]) -> Vec<&str> {
        tools.iter().map(|t| t.name()).collect()
    }

    fn sample_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register_batch([
                tool(
                    ToolDefinition::new("browser_click", "Click")
                        .with_group("browser")
                        .with_tag(ToolTag::BrowserClick),
                ),
                tool(
                    ToolDefinition::new("browser_navigate", "Navigate")
                        .with_group("browser")
                        .with_tag(ToolTag::BrowserNavigate),
                ),
                tool(
                    ToolDefinition::new("read_file", "Read")
                        .with_group("fs")
                        .with_tag(ToolTag::FileRead),
                ),
            ])
            .unwrap();
        registry
    }

    // ==================== register ====================

    #[test]
    fn test_register_and_get() {
        let registry = sample_registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.get_tool("read_file").is_some());
        assert!(registry.get_tool("missing").is_none());
        assert_eq!(
            names(&registry.get_tools()),
            vec!["browser_click", "browser_navigate", "read_file"]
        );
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = sample_registry();
        let err = registry
            .register(tool(ToolDefinition::new("read_file", "Again")))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateTool);
        assert!(err.to_string().contains("read_file"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_batch_keeps_tools_before_duplicate() {
        let mut registry = ToolRegistry::new();
        let result = registry.register_batch([
            tool(ToolDefinition::new("a", "A")),
            tool(ToolDefinition::new("a", "A again")),
            tool(ToolDefinition::new("b", "B")),
        ]);

        assert!(result.is_err());
        assert!(registry.has_tool("a"));
        assert!(!registry.has_tool("b"));
    }

    #[test]
    fn test_ungrouped_tool_lands_in_default_group() {
        let mut registry = ToolRegistry::with_default_group("main");
        registry.register(tool(ToolDefinition::new("x", "X"))).unwrap();
        assert_eq!(registry.get_groups(), vec!["main"]);
        assert_eq!(names(&registry.get_group("main")), vec!["x"]);
    }

    #[test]
    fn test_default_group_matches_dispatch_config() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.default_group(), DispatchConfig::default().default_group);
    }

    // ==================== tag queries ====================

    #[test]
    fn test_find_by_tag() {
        let registry = sample_registry();
        assert_eq!(
            names(&registry.find_tools_by_tag(&[ToolTag::FileRead])),
            vec!["read_file"]
        );
        assert_eq!(registry.find_tools_by_tag(&[]).len(), 3);
        assert!(registry.find_tools_by_tag(&[ToolTag::WebFetch]).is_empty());
    }

    #[test]
    fn test_find_by_tag_is_intersection() {
        let mut registry = ToolRegistry::new();
        registry
            .register_batch([
                tool(
                    ToolDefinition::new("fetch", "Fetch")
                        .with_tag(ToolTag::WebFetch)
                        .with_tag(ToolTag::WebScrape),
                ),
                tool(ToolDefinition::new("search", "Search").with_tag(ToolTag::WebFetch)),
                tool(
                    ToolDefinition::new("scrape", "Scrape")
                        .with_tag(ToolTag::WebScrape)
                        .with_tag(ToolTag::WebFetch),
                ),
            ])
            .unwrap();

        let both = registry.find_tools_by_tag(&[ToolTag::WebScrape, ToolTag::WebFetch]);
        assert_eq!(names(&both), vec!["fetch", "scrape"]);
    }

    // ==================== groups ====================

    #[test]
    fn test_groups_in_first_seen_order() {
        let registry = sample_registry();
        assert_eq!(registry.get_groups(), vec!["browser", "fs"]);
        assert_eq!(
            names(&registry.get_group("browser")),
            vec!["browser_click", "browser_navigate"]
        );
        assert!(registry.get_group("nope").is_empty());
    }

    // ==================== unregister ====================

    #[test]
    fn test_unregister_prunes_indexes() {
        let mut registry = sample_registry();
        assert!(registry.unregister("read_file"));

        assert!(registry.find_tools_by_tag(&[ToolTag::FileRead]).is_empty());
        assert!(!registry.get_groups().contains(&"fs".to_string()));
        assert!(!registry.get_tags().contains(&ToolTag::FileRead));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_keeps_shared_group() {
        let mut registry = sample_registry();
        registry.unregister("browser_click");

        assert_eq!(registry.get_groups(), vec!["browser", "fs"]);
        assert_eq!(names(&registry.get_group("browser")), vec!["browser_navigate"]);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut registry = sample_registry();
        assert!(!registry.unregister("missing"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_after_unregister() {
        let mut registry = sample_registry();
        registry.unregister("read_file");
        registry
            .register(tool(ToolDefinition::new("read_file", "Read again")))
            .unwrap();
        assert_eq!(
            names(&registry.get_tools()),
            vec!["browser_click", "browser_navigate", "read_file"]
        );
    }

    // ==================== policies ====================

    #[test]
    fn test_filter_tools_allow_with_deny() {
        let registry = sample_registry();
        let policy = ToolPolicy::new()
            .with_allow(["browser_*"])
            .with_deny(["browser_click"]);

        assert_eq!(names(&registry.filter_tools(&policy)), vec!["browser_navigate"]);
    }

    #[test]
    fn test_filter_tools_deny_only() {
        let registry = sample_registry();
        let policy = ToolPolicy::new().with_deny(["*_click"]);
        assert_eq!(
            names(&registry.filter_tools(&policy)),
            vec!["browser_navigate", "read_file"]
        );
    }

    #[test]
    fn test_is_tool_allowed_deny_precedence() {
        let registry = sample_registry();
        let allow_first = ToolPolicy::new()
            .with_allow(["read_file"])
            .with_deny(["read_*"]);
        let deny_first = ToolPolicy::new()
            .with_deny(["*_file"])
            .with_allow(["read_*"]);

        assert!(!registry.is_tool_allowed("read_file", &allow_first));
        assert!(!registry.is_tool_allowed("read_file", &deny_first));
        assert!(registry.is_tool_allowed("anything", &ToolPolicy::new()));
    }

    // ==================== misc ====================

    #[test]
    fn test_schemas_and_clear() {
        let mut registry = sample_registry();
        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 3);
        assert_eq!(schemas[2]["name"], "read_file");

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get_groups().is_empty());
        assert!(registry.get_tags().is_empty());
    }
}
