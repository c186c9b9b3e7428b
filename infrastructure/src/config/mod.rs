//! Configuration file loading for tool-dispatch
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DISPATCH_`-prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./dispatch.toml` or `./.dispatch.toml`
//! 4. Global: `$XDG_CONFIG_HOME/tool-dispatch/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDispatchConfig, FileLogConfig, FileMonitorConfig, FileOutputConfig,
    FilePolicyConfig,
};
pub use loader::ConfigLoader;
