//! Presentation-level configuration
//!
//! Output settings after merging CLI flags over the config file.

use crate::cli::commands::OutputFormat as CliOutputFormat;
use dispatch_domain::OutputFormat;

/// Resolved output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

impl OutputConfig {
    /// CLI flag first, then the file's `[output]` values, then defaults.
    pub fn resolve(
        cli_format: Option<CliOutputFormat>,
        file_format: Option<OutputFormat>,
        file_color: bool,
    ) -> Self {
        Self {
            format: cli_format
                .map(Into::into)
                .or(file_format)
                .unwrap_or_default(),
            color: file_color,
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_wins_over_file() {
        let config = OutputConfig::resolve(Some(CliOutputFormat::Json), Some(OutputFormat::Text), true);
        assert!(config.is_json());
    }

    #[test]
    fn test_file_then_default() {
        assert!(OutputConfig::resolve(None, Some(OutputFormat::Json), false).is_json());
        let config = OutputConfig::resolve(None, None, false);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.color);
    }
}
