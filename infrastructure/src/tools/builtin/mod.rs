//! Built-in tool set
//!
//! Every tool this crate ships, ready to register.

use dispatch_application::{Tool, ToolRegistry};
use dispatch_domain::DispatchError;

use super::{browser, file, memory, wait};

/// All built-in tools in registration order.
pub fn builtin_tools() -> Vec<Tool> {
    vec![
        file::read_file_tool(),
        file::write_file_tool(),
        file::list_dir_tool(),
        memory::memory_save_tool(),
        memory::memory_get_tool(),
        memory::memory_search_tool(),
        browser::browser_current_url_tool(),
        wait::wait_tool(),
    ]
}

/// Only tools that do not modify anything.
pub fn read_only_tools() -> Vec<Tool> {
    vec![
        file::read_file_tool(),
        file::list_dir_tool(),
        memory::memory_get_tool(),
        memory::memory_search_tool(),
        browser::browser_current_url_tool(),
    ]
}

/// Register every built-in tool into `registry`.
pub fn register_builtin_tools(registry: &mut ToolRegistry) -> Result<(), DispatchError> {
    registry.register_batch(builtin_tools())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_domain::ToolTag;

    #[test]
    fn test_register_builtin_tools() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry).unwrap();

        assert_eq!(registry.len(), builtin_tools().len());
        assert_eq!(registry.get_groups(), vec!["filesystem", "memory", "browser", "default"]);
        assert_eq!(registry.find_tools_by_tag(&[ToolTag::FileRead]).len(), 2);
    }

    #[test]
    fn test_registering_twice_is_a_duplicate() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry).unwrap();
        assert!(register_builtin_tools(&mut registry).is_err());
    }

    #[test]
    fn test_read_only_subset() {
        let names: Vec<String> = read_only_tools().iter().map(|t| t.name().to_string()).collect();
        assert!(!names.iter().any(|n| n == file::WRITE_FILE || n == memory::MEMORY_SAVE));
        assert!(names.iter().all(|n| builtin_tools().iter().any(|t| t.name() == n)));
    }
}
