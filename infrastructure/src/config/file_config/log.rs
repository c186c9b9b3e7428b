//! Logging configuration from TOML (`[log]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// `EnvFilter` directive used when no `-v` flag is given (e.g. "info")
    pub level: Option<String>,
    /// Also write tracing output to this file
    pub file: Option<PathBuf>,
    /// Append every execution result to this JSONL file
    pub jsonl: Option<PathBuf>,
}
