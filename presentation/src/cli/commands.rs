//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for execution results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    Text,
    /// JSON output
    Json,
}

impl From<OutputFormat> for dispatch_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => dispatch_domain::OutputFormat::Text,
            OutputFormat::Json => dispatch_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for tool-dispatch
#[derive(Parser, Debug)]
#[command(name = "tool-dispatch")]
#[command(author, version, about = "Run tools through a grouped, policy-checked scheduler")]
#[command(long_about = r#"
tool-dispatch runs built-in tools through the dispatcher: capabilities are
injected from the execution context, each call gets a timeout and optional
retries, and tools sharing a resource group never run at the same time.

Configuration files are loaded from (in priority order):
1. DISPATCH_* environment variables
2. --config <path>          Explicit config file
3. ./dispatch.toml          Project-level config
4. ~/.config/tool-dispatch/config.toml   Global config

Example:
  tool-dispatch list --tag file:read
  tool-dispatch run read_file --params '{"path": "Cargo.toml"}'
  tool-dispatch run browser_current_url --url https://github.com
  tool-dispatch batch calls.json --jsonl executions.jsonl
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format in config)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Append every execution result to this JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub jsonl: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available tools
    List(ListArgs),
    /// Run a single tool
    Run(RunArgs),
    /// Run a JSON array of `{"tool": ..., "params": {...}}` calls through the scheduler
    Batch(BatchArgs),
    /// List the built-in policy profiles
    Profiles,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only tools carrying every given tag (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Allow pattern such as `browser_*` (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub allow: Vec<String>,

    /// Deny pattern such as `*_file` (repeatable, wins over allow)
    #[arg(long, value_name = "PATTERN")]
    pub deny: Vec<String>,

    /// Print JSON schemas instead of a summary
    #[arg(long)]
    pub schema: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tool name
    pub tool: String,

    /// Parameters as a JSON object
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    pub params: String,

    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON file holding the calls
    pub file: PathBuf,

    #[command(flatten)]
    pub exec: ExecArgs,
}

/// Knobs shared by `run` and `batch`.
#[derive(Args, Debug, Default)]
pub struct ExecArgs {
    /// URL the browser capability reports as the current page
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Root directory for relative file paths
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Extra attempts after a timeout or failure
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Pause between attempts in milliseconds
    #[arg(long, value_name = "MS")]
    pub retry_delay_ms: Option<u64>,

    /// Layered policy profile checked before running (see `profiles`)
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,
}
