//! Infrastructure layer for tool-dispatch
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, configuration file loading, and the
//! built-in tools.

pub mod capabilities;
pub mod config;
pub mod logging;
pub mod tools;

// Re-export commonly used types
pub use capabilities::{FixedUrlBrowser, InMemoryMemoryStore, LocalFileSystem};
pub use config::{
    ConfigLoader, FileConfig, FileDispatchConfig, FileLogConfig, FileMonitorConfig,
    FileOutputConfig, FilePolicyConfig,
};
pub use logging::JsonlExecutionLog;
pub use tools::{builtin_tools, read_only_tools, register_builtin_tools};
