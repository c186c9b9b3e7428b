//! Host patterns restricting where a tool may run
//!
//! | Form | Example | Matches |
//! |------|---------|---------|
//! | catch-all | `*` | any host |
//! | subdomain | `*.example.com` | `example.com` and every subdomain |
//! | any path | `example.com/*` | host `example.com`, any path |
//! | any port | `localhost:*` | host `localhost`, any port or none |
//! | exact | `example.com`, `localhost:8080` | that host, or that host and port |
//! | host + path | `example.com/docs` | that host with exactly that path |

use url::Url;

/// Parsed form of a domain pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPattern {
    Any,
    Subdomain(String),
    AnyPath(String),
    AnyPort(String),
    Exact(String),
    HostPath(String),
}

impl DomainPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            DomainPattern::Any
        } else if let Some(domain) = pattern.strip_prefix("*.") {
            DomainPattern::Subdomain(domain.to_string())
        } else if let Some((domain, _)) = pattern.split_once("/*") {
            DomainPattern::AnyPath(domain.to_string())
        } else if let Some((domain, _)) = pattern.split_once(":*") {
            DomainPattern::AnyPort(domain.to_string())
        } else if pattern.contains('/') {
            DomainPattern::HostPath(pattern.to_string())
        } else {
            DomainPattern::Exact(pattern.to_string())
        }
    }

    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host_port = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        match self {
            DomainPattern::Any => true,
            DomainPattern::Subdomain(domain) => {
                host == domain || host.ends_with(&format!(".{}", domain))
            }
            DomainPattern::AnyPath(domain) => host == domain,
            DomainPattern::AnyPort(domain) => {
                host == domain || host_port.starts_with(&format!("{}:", domain))
            }
            DomainPattern::Exact(pattern) => host == pattern || host_port == *pattern,
            DomainPattern::HostPath(pattern) => {
                let full = format!("{}{}", host, url.path());
                full == *pattern || full.strip_suffix('/') == Some(pattern.as_str())
            }
        }
    }
}

/// Whether `url` matches any of the pattern strings.
pub fn url_matches_any<S: AsRef<str>>(url: &Url, patterns: &[S]) -> bool {
    patterns
        .iter()
        .any(|p| DomainPattern::parse(p.as_ref()).matches(url))
}

/// Host of `raw`, or `raw` itself when it does not parse as a URL.
pub fn extract_host(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(DomainPattern::parse("*"), DomainPattern::Any);
        assert_eq!(
            DomainPattern::parse("*.github.com"),
            DomainPattern::Subdomain("github.com".into())
        );
        assert_eq!(
            DomainPattern::parse("github.com/*"),
            DomainPattern::AnyPath("github.com".into())
        );
        assert_eq!(
            DomainPattern::parse("localhost:*"),
            DomainPattern::AnyPort("localhost".into())
        );
        assert_eq!(
            DomainPattern::parse("localhost:8080"),
            DomainPattern::Exact("localhost:8080".into())
        );
        assert_eq!(
            DomainPattern::parse("github.com/docs"),
            DomainPattern::HostPath("github.com/docs".into())
        );
    }

    #[test]
    fn test_subdomain_matches_apex_and_children() {
        let p = DomainPattern::parse("*.allowed.com");
        assert!(p.matches(&url("https://allowed.com")));
        assert!(p.matches(&url("https://shop.allowed.com/cart")));
        assert!(!p.matches(&url("https://shop.example.com")));
        assert!(!p.matches(&url("https://notallowed.com")));
    }

    #[test]
    fn test_any_port() {
        let p = DomainPattern::parse("localhost:*");
        assert!(p.matches(&url("http://localhost:3000")));
        assert!(p.matches(&url("http://localhost")));
        assert!(!p.matches(&url("http://example.com:3000")));
    }

    #[test]
    fn test_exact_with_port() {
        let p = DomainPattern::parse("localhost:8080");
        assert!(p.matches(&url("http://localhost:8080/x")));
        assert!(!p.matches(&url("http://localhost:9090")));
        assert!(DomainPattern::parse("example.com").matches(&url("https://example.com/any")));
    }

    #[test]
    fn test_host_path() {
        let p = DomainPattern::parse("github.com/docs");
        assert!(p.matches(&url("https://github.com/docs")));
        assert!(p.matches(&url("https://github.com/docs/")));
        assert!(!p.matches(&url("https://github.com/other")));
    }

    #[test]
    fn test_url_without_host_never_matches() {
        assert!(!DomainPattern::Any.matches(&url("data:text/plain,hello")));
    }

    #[test]
    fn test_helpers() {
        let patterns = vec!["*.github.com".to_string(), "localhost:*".to_string()];
        assert!(url_matches_any(&url("https://api.github.com"), &patterns));
        assert!(!url_matches_any(&url("https://gitlab.com"), &patterns));
        assert_eq!(extract_host("https://shop.example.com/a"), "shop.example.com");
        assert_eq!(extract_host("not a url"), "not a url");
    }
}
