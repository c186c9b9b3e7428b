//! Built-in tool implementations
//!
//! Each tool declares its resource group and injection contract, so the
//! scheduler serializes work on the same resource and the injector hands it
//! the capabilities it needs:
//!
//! | Tool | Group | Injects |
//! |------|-------|---------|
//! | `read_file`, `write_file`, `list_dir` | `filesystem` | fileSystem (+ logger for writes) |
//! | `memory_save`, `memory_get`, `memory_search` | `memory` | memory |
//! | `browser_current_url` | `browser` | browser |
//! | `wait` | default | - |

pub mod browser;
pub mod builtin;
pub mod file;
pub mod memory;
pub mod wait;

pub use builtin::{builtin_tools, read_only_tools, register_builtin_tools};
