//! Browser stand-in that reports a fixed page.

use dispatch_application::ports::BrowserSession;
use parking_lot::RwLock;

/// [`BrowserSession`] whose current URL is set by the host (e.g. `--url`).
#[derive(Debug, Default)]
pub struct FixedUrlBrowser {
    url: RwLock<Option<String>>,
}

impl FixedUrlBrowser {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url: RwLock::new(url),
        }
    }

    pub fn navigate(&self, url: impl Into<String>) {
        *self.url.write() = Some(url.into());
    }
}

impl BrowserSession for FixedUrlBrowser {
    fn current_url(&self) -> Option<String> {
        self.url.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_updates_url() {
        let browser = FixedUrlBrowser::new(None);
        assert!(browser.current_url().is_none());

        browser.navigate("https://github.com");
        assert_eq!(browser.current_url().as_deref(), Some("https://github.com"));
    }
}
