//! Single-wildcard tool name patterns
//!
//! | Pattern | Matches |
//! |---------|---------|
//! | `read_file` | exactly `read_file` |
//! | `browser_*` | any name starting with `browser_` |
//! | `*_click` | any name ending with `_click` |
//! | `*` | every name |
//!
//! A `*` anywhere else is taken literally, so `a*b` only matches the name `a*b`.

/// Whether `name` matches `pattern`.
pub fn matches_name(pattern: &str, name: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix('*') {
        name.starts_with(prefix)
    } else if let Some(suffix) = pattern.strip_prefix('*') {
        name.ends_with(suffix)
    } else {
        pattern == name
    }
}

/// Whether `name` matches any of `patterns`.
pub fn matches_any<S: AsRef<str>>(patterns: &[S], name: &str) -> bool {
    patterns.iter().any(|p| matches_name(p.as_ref(), name))
}

/// A pattern is well formed when it has at most one `*`, placed at either end.
pub fn is_well_formed(pattern: &str) -> bool {
    match pattern.matches('*').count() {
        0 => !pattern.is_empty(),
        1 => pattern.starts_with('*') || pattern.ends_with('*'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        assert!(matches_name("read_file", "read_file"));
        assert!(!matches_name("read_file", "read_files"));
    }

    #[test]
    fn test_prefix_glob() {
        assert!(matches_name("browser_*", "browser_click"));
        assert!(matches_name("browser_*", "browser_"));
        assert!(!matches_name("browser_*", "read_file"));
    }

    #[test]
    fn test_suffix_glob() {
        assert!(matches_name("*_click", "browser_click"));
        assert!(!matches_name("*_click", "browser_clicks"));
    }

    #[test]
    fn test_star_matches_everything() {
        assert!(matches_name("*", "anything"));
        assert!(matches_name("*", ""));
    }

    #[test]
    fn test_middle_star_is_literal() {
        assert!(!matches_name("a*b", "axxb"));
        assert!(matches_name("a*b", "a*b"));
    }

    #[test]
    fn test_well_formed() {
        assert!(is_well_formed("browser_*"));
        assert!(is_well_formed("*_click"));
        assert!(is_well_formed("*"));
        assert!(is_well_formed("read_file"));
        assert!(!is_well_formed("a*b"));
        assert!(!is_well_formed("*a*"));
        assert!(!is_well_formed(""));
    }
}
