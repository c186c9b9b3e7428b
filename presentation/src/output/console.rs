//! Console output formatter for execution results

use colored::Colorize;
use dispatch_application::{ExecutionStats, PermissionResult, Tool};
use dispatch_domain::{ConfigIssue, ExecutionResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Formats execution results, tool listings and stats for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One result: status line, then the value or the error.
    pub fn format_result(result: &ExecutionResult) -> String {
        let mut output = String::new();

        let status = if result.success {
            "v".green().bold()
        } else {
            "x".red().bold()
        };
        output.push_str(&format!(
            "{} {} {}\n",
            status,
            result.tool_name().bold(),
            format!(
                "({} ms, {} {})",
                result.duration_ms,
                result.attempts,
                if result.attempts == 1 { "attempt" } else { "attempts" }
            )
            .dimmed()
        ));

        if result.success {
            if let Some(value) = &result.result {
                output.push_str(&Self::indent(&Self::render_value(value), "  "));
                output.push('\n');
            }
        } else {
            let kind = result
                .error_kind
                .map(|k| k.as_str().to_string())
                .unwrap_or_else(|| "error".to_string());
            output.push_str(&format!(
                "  {} {}\n",
                format!("{}:", kind).red(),
                result.error.as_deref().unwrap_or("Unknown")
            ));
        }

        output
    }

    /// Format any serializable value as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Tool summary table: name, group, tags, description.
    pub fn format_tools(tools: &[Arc<Tool>], default_group: &str) -> String {
        if tools.is_empty() {
            return format!("{}\n", "No tools match.".dimmed());
        }

        let width = tools.iter().map(|t| t.name().len()).max().unwrap_or(0);
        let mut output = Self::section_header(&format!("Tools ({})", tools.len()));

        for tool in tools {
            let def = tool.definition();
            let tags: Vec<&str> = def.tags.iter().map(|t| t.as_str()).collect();
            output.push_str(&format!(
                "{:<width$}  {:<12} {}\n",
                def.name.yellow().bold(),
                format!("[{}]", def.group_or(default_group)).cyan(),
                def.description,
                width = width
            ));
            if !tags.is_empty() {
                output.push_str(&format!(
                    "{:<width$}  {}\n",
                    "",
                    tags.join(", ").dimmed(),
                    width = width
                ));
            }
        }
        output
    }

    /// Overall stats followed by one line per tool.
    pub fn format_stats(overall: &ExecutionStats, per_tool: &BTreeMap<String, ExecutionStats>) -> String {
        let mut output = Self::section_header("Execution Stats");
        output.push_str(&format!("{}\n", Self::stats_line("total", overall)));
        for (name, stats) in per_tool {
            output.push_str(&format!("{}\n", Self::stats_line(name, stats)));
        }
        output
    }

    fn stats_line(label: &str, stats: &ExecutionStats) -> String {
        let range = match (stats.min_duration, stats.max_duration) {
            (Some(min), Some(max)) => format!("{}-{} ms", min, max),
            _ => "-".to_string(),
        };
        format!(
            "  {:<20} {:>3} runs  {} ok  {} failed  {:>5.1}%  avg {:.1} ms  ({})",
            label.bold(),
            stats.total,
            stats.successful.to_string().green(),
            stats.failed.to_string().red(),
            stats.success_rate * 100.0,
            stats.avg_duration,
            range
        )
    }

    pub fn format_denied(tool: &str, permission: &PermissionResult) -> String {
        format!(
            "{} {} {}\n",
            "x".red().bold(),
            tool.bold(),
            permission
                .reason
                .as_deref()
                .unwrap_or("Denied by policy")
                .red()
        )
    }

    pub fn format_issue(issue: &ConfigIssue) -> String {
        if issue.is_error() {
            format!("{} {}", "error:".red().bold(), issue.message)
        } else {
            format!("{} {}", "warning:".yellow().bold(), issue.message)
        }
    }

    fn render_value(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::String(s) => s.clone(),
            other => Self::format_json(other),
        }
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
