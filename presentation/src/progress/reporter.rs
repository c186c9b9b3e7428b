//! Progress reporting for dispatched tools
//!
//! Both reporters are [`ExecutionSink`]s: the scheduler hands them every
//! finished result.

use colored::Colorize;
use dispatch_application::ExecutionSink;
use dispatch_domain::ExecutionResult;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

/// Progress bar over a known number of calls
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    /// Show a fresh bar for `total` calls.
    pub fn start(&self, label: &str, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(Self::bar_style());
        bar.set_prefix(label.to_string());
        bar.set_message("Starting...");
        *self.bar.lock() = Some(bar);
    }

    pub fn finish(&self) {
        if let Some(bar) = self.bar.lock().take() {
            bar.finish_and_clear();
        }
    }

    pub fn position(&self) -> Option<u64> {
        self.bar.lock().as_ref().map(ProgressBar::position)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionSink for ProgressReporter {
    fn on_result(&self, result: &ExecutionResult) {
        if let Some(bar) = self.bar.lock().as_ref() {
            let status = if result.success {
                format!("{} {}", "v".green(), result.tool_name())
            } else {
                format!("{} {}", "x".red(), result.tool_name())
            };
            bar.set_message(status);
            bar.inc(1);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ExecutionSink for SimpleProgress {
    fn on_result(&self, result: &ExecutionResult) {
        if result.success {
            eprintln!("  {} {} ({} ms)", "v".green(), result.tool_name(), result.duration_ms);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), result.tool_name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_domain::ToolCallRecord;
    use serde_json::{Map, json};

    fn result() -> ExecutionResult {
        ExecutionResult::success(ToolCallRecord::new("t", Map::new()), json!(null), 1, 1)
    }

    #[test]
    fn test_results_advance_the_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_result(&result());
        assert_eq!(reporter.position(), None);

        reporter.start("batch", 3);
        reporter.on_result(&result());
        reporter.on_result(&result());
        assert_eq!(reporter.position(), Some(2));

        reporter.finish();
        assert_eq!(reporter.position(), None);
    }
}
