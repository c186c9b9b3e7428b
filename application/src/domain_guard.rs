//! Domain Guard
//!
//! Decides whether a tool with a `domains` restriction may run against the
//! browser's current page. A tool without restrictions is always allowed. A
//! restricted tool is refused when there is no browser, the browser reports
//! no URL, or the URL does not parse.

use dispatch_domain::policy::{extract_host, url_matches_any};
use dispatch_domain::{DispatchError, ToolDefinition};
use url::Url;

use crate::context::ExecutionContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct DomainGuard;

impl DomainGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, tool: &ToolDefinition, context: &ExecutionContext) -> bool {
        if tool.domains.is_empty() {
            return true;
        }
        let Some(raw) = context.current_url() else {
            return false;
        };
        match Url::parse(&raw) {
            Ok(url) => url_matches_any(&url, &tool.domains),
            Err(_) => false,
        }
    }

    /// [`check`](Self::check), turned into a `DomainNotAllowed` error on refusal.
    pub fn validate(
        &self,
        tool: &ToolDefinition,
        context: &ExecutionContext,
    ) -> Result<(), DispatchError> {
        if self.check(tool, context) {
            return Ok(());
        }
        let domain = context
            .current_url()
            .map(|raw| extract_host(&raw))
            .unwrap_or_else(|| "unknown".to_string());

        Err(DispatchError::DomainNotAllowed {
            tool: tool.name.clone(),
            domain,
            allowed: tool.domains.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextOptions, ExecutionContextManager};
    use crate::ports::BrowserSession;
    use std::sync::Arc;

    struct Browser(Option<&'static str>);

    impl BrowserSession for Browser {
        fn current_url(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn ctx(url: Option<&'static str>) -> ExecutionContext {
        ExecutionContextManager::new()
            .create(ContextOptions::new().with_browser(Arc::new(Browser(url))))
    }

    fn restricted() -> ToolDefinition {
        ToolDefinition::new("browser_click", "Click").with_domain("*.allowed.com")
    }

    #[test]
    fn test_unrestricted_tool_always_allowed() {
        let tool = ToolDefinition::new("read_file", "Read");
        assert!(DomainGuard::new().check(&tool, &ExecutionContext::default()));
    }

    #[test]
    fn test_matching_host_allowed() {
        assert!(DomainGuard::new().check(&restricted(), &ctx(Some("https://shop.allowed.com/x"))));
    }

    #[test]
    fn test_refused_without_browser_or_url() {
        let guard = DomainGuard::new();
        assert!(!guard.check(&restricted(), &ExecutionContext::default()));
        assert!(!guard.check(&restricted(), &ctx(None)));
        assert!(!guard.check(&restricted(), &ctx(Some("not a url"))));
    }

    #[test]
    fn test_validate_reports_host() {
        let err = DomainGuard::new()
            .validate(&restricted(), &ctx(Some("https://shop.example.com/cart")))
            .unwrap_err();

        match err {
            DispatchError::DomainNotAllowed {
                tool,
                domain,
                allowed,
            } => {
                assert_eq!(tool, "browser_click");
                assert_eq!(domain, "shop.example.com");
                assert_eq!(allowed, vec!["*.allowed.com"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_without_url_reports_unknown() {
        let err = DomainGuard::new()
            .validate(&restricted(), &ExecutionContext::default())
            .unwrap_err();
        assert!(err.to_string().contains("current domain: unknown"));
    }
}
