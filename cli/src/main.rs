//! CLI entrypoint for tool-dispatch
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use dispatch_application::policy::profiles;
use dispatch_application::{
    BatchItem, CompositeSink, ContextOptions, DispatchConfig, ExecutionContext,
    ExecutionContextManager, ExecutionOptions, ExecutionSink, PolicyResolver, Tool, ToolLogger,
    ToolMonitor, ToolRegistry, ToolScheduler,
};
use dispatch_domain::{ExecutionResult, ToolPolicy, ToolTag};
use dispatch_infrastructure::{
    ConfigLoader, FileConfig, FixedUrlBrowser, InMemoryMemoryStore, JsonlExecutionLog,
    LocalFileSystem, register_builtin_tools,
};
use dispatch_presentation::{
    BatchArgs, Cli, Command, ConsoleFormatter, ExecArgs, ListArgs, OutputConfig,
    ProgressReporter, RunArgs,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// One entry of a batch file
#[derive(Debug, Deserialize)]
struct BatchCall {
    tool: String,
    #[serde(default)]
    params: Map<String, Value>,
}

/// Everything a `run`/`batch` invocation needs.
struct Runtime {
    registry: ToolRegistry,
    dispatch: DispatchConfig,
    name_policy: ToolPolicy,
    resolver: PolicyResolver,
    context: ExecutionContext,
    options: ExecutionOptions,
    monitor: Arc<ToolMonitor>,
    scheduler: ToolScheduler,
    progress: Option<Arc<ProgressReporter>>,
    output: OutputConfig,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, &file_config)?;
    info!("Starting tool-dispatch");

    let issues = file_config.validate();
    for issue in &issues {
        eprintln!("{}", ConsoleFormatter::format_issue(issue));
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Configuration has errors");
    }

    let output = OutputConfig::resolve(cli.output, file_config.output.format, file_config.output.color);
    if !output.color {
        colored::control::set_override(false);
    }

    let dispatch = file_config.to_dispatch_config();
    let mut registry = ToolRegistry::with_default_group(dispatch.default_group.clone());
    register_builtin_tools(&mut registry)?;

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Command::Profiles => {
            for name in profiles::PROFILE_NAMES {
                println!("{}", name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::List(args) => {
            list_tools(&registry, &file_config, &args, output);
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(args) => {
            let params = parse_params(&args.params)?;
            let runtime = build_runtime(
                registry,
                dispatch,
                &file_config,
                &args.exec,
                cli.jsonl.as_ref().or(file_config.log.jsonl.as_ref()),
                cli.quiet,
                output,
            )?;
            run_one(runtime, &args, params).await
        }
        Command::Batch(args) => {
            let runtime = build_runtime(
                registry,
                dispatch,
                &file_config,
                &args.exec,
                cli.jsonl.as_ref().or(file_config.log.jsonl.as_ref()),
                cli.quiet,
                output,
            )?;
            run_batch(runtime, &args).await
        }
    }
}

/// Initialize tracing based on verbosity level and `[log]` settings.
///
/// The returned guard must stay alive for file logging to flush.
fn init_logging(verbose: u8, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new(config.log.level.as_deref().unwrap_or("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match &config.log.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .context("log.file must name a file")?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Could not create log directory {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}

fn parse_params(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw).context("--params is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("--params must be a JSON object, got {}", other),
    }
}

/// Registry filter from the config file, widened by CLI patterns.
fn name_policy(file_config: &FileConfig, allow: &[String], deny: &[String]) -> ToolPolicy {
    let mut policy = file_config.policy.to_tool_policy();
    if !allow.is_empty() {
        policy = policy.with_allow(allow.iter().cloned());
    }
    if !deny.is_empty() {
        policy = policy.with_deny(deny.iter().cloned());
    }
    policy
}

fn list_tools(registry: &ToolRegistry, file_config: &FileConfig, args: &ListArgs, output: OutputConfig) {
    let policy = name_policy(file_config, &args.allow, &args.deny);
    let tags: Vec<ToolTag> = args.tags.iter().map(|t| ToolTag::from(t.as_str())).collect();
    let tools: Vec<Arc<Tool>> = registry
        .find_tools_by_tag(&tags)
        .into_iter()
        .filter(|tool| policy.is_allowed(tool.name()))
        .collect();

    if args.schema || output.is_json() {
        let schemas: Vec<Value> = tools.iter().map(|t| t.definition().to_json_schema()).collect();
        println!("{}", ConsoleFormatter::format_json(&schemas));
    } else {
        print!("{}", ConsoleFormatter::format_tools(&tools, registry.default_group()));
    }
}

fn build_runtime(
    registry: ToolRegistry,
    dispatch: DispatchConfig,
    file_config: &FileConfig,
    exec: &ExecArgs,
    jsonl: Option<&std::path::PathBuf>,
    quiet: bool,
    output: OutputConfig,
) -> Result<Runtime> {
    let profile = match &exec.profile {
        Some(name) => profiles::by_name(name).with_context(|| {
            format!(
                "Unknown profile '{}', valid values: {}",
                name,
                profiles::PROFILE_NAMES.join(", ")
            )
        })?,
        None => file_config.policy.parse_profile().0,
    };

    let file_system = match &exec.root {
        Some(root) => LocalFileSystem::with_root(root),
        None => LocalFileSystem::new(),
    };
    let context = ExecutionContextManager::new()
        .with_default_logger_name("tool-dispatch")
        .create(
            ContextOptions::new()
                .with_logger(ToolLogger::new("tool-dispatch"))
                .with_file_system(Arc::new(file_system))
                .with_memory(Arc::new(InMemoryMemoryStore::new()))
                .with_browser(Arc::new(FixedUrlBrowser::new(exec.url.clone()))),
        );

    let mut options = ExecutionOptions::new().with_retries(exec.retries);
    if let Some(ms) = exec.timeout_ms {
        options = options.with_timeout(Duration::from_millis(ms));
    }
    if let Some(ms) = exec.retry_delay_ms {
        options = options.with_retry_delay(Duration::from_millis(ms));
    }

    let mut sinks = CompositeSink::new();
    if let Some(path) = jsonl {
        match JsonlExecutionLog::new(path) {
            Some(log) => sinks = sinks.with(Arc::new(log)),
            None => eprintln!("Warning: could not open execution log {}", path.display()),
        }
    }
    let progress = (!quiet && !output.is_json()).then(|| Arc::new(ProgressReporter::new()));
    if let Some(progress) = &progress {
        sinks = sinks.with(progress.clone() as Arc<dyn ExecutionSink>);
    }

    let monitor = Arc::new(ToolMonitor::from_config(&dispatch));
    let mut scheduler = ToolScheduler::from_config(&dispatch).with_monitor(monitor.clone());
    if !sinks.is_empty() {
        scheduler = scheduler.with_sink(Arc::new(sinks));
    }

    Ok(Runtime {
        registry,
        name_policy: file_config.policy.to_tool_policy(),
        resolver: PolicyResolver::new(&profile),
        dispatch,
        context,
        options,
        monitor,
        scheduler,
        progress,
        output,
    })
}

impl Runtime {
    /// Look a tool up and run both policy checks.
    ///
    /// `Err` carries a message ready to print.
    async fn admit(&self, name: &str) -> Result<Arc<Tool>, String> {
        let Some(tool) = self.registry.get_tool(name) else {
            return Err(format!("Unknown tool '{}'", name));
        };
        if !self.registry.is_tool_allowed(name, &self.name_policy) {
            return Err(format!("Tool '{}' is excluded by [policy] allow/deny", name));
        }
        let permission = self.resolver.resolve(tool.definition(), &self.context).await;
        if !permission.allowed {
            return Err(ConsoleFormatter::format_denied(name, &permission).trim_end().to_string());
        }
        Ok(tool)
    }

    fn print_result(&self, result: &ExecutionResult) {
        if self.output.is_json() {
            println!("{}", ConsoleFormatter::format_json(result));
        } else {
            print!("{}", ConsoleFormatter::format_result(result));
        }
    }
}

async fn run_one(runtime: Runtime, args: &RunArgs, params: Map<String, Value>) -> Result<ExitCode> {
    let tool = match runtime.admit(&args.tool).await {
        Ok(tool) => tool,
        Err(message) => {
            eprintln!("{}", message);
            return Ok(ExitCode::FAILURE);
        }
    };

    let result = runtime
        .scheduler
        .execute_with_options(tool, params, &runtime.context, &runtime.options)
        .await;
    runtime.scheduler.shutdown().await;

    runtime.print_result(&result);
    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run_batch(runtime: Runtime, args: &BatchArgs) -> Result<ExitCode> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Could not read {}", args.file.display()))?;
    let calls: Vec<BatchCall> = serde_json::from_str(&raw)
        .with_context(|| format!("{} must hold a JSON array of {{tool, params}}", args.file.display()))?;

    let mut items = Vec::with_capacity(calls.len());
    let mut rejected = 0usize;
    for call in calls {
        match runtime.admit(&call.tool).await {
            Ok(tool) => items.push(BatchItem::new(tool, call.params)),
            Err(message) => {
                eprintln!("{}", message);
                rejected += 1;
            }
        }
    }

    if let Some(progress) = &runtime.progress {
        progress.start("batch", items.len());
    }
    let results = runtime
        .scheduler
        .execute_batch(items, &runtime.context, &runtime.options)
        .await;
    if let Some(progress) = &runtime.progress {
        progress.finish();
    }
    info!(groups = ?runtime.scheduler.get_groups(), "Batch finished");
    runtime.scheduler.shutdown().await;

    let overall = runtime.monitor.get_stats(None);
    if runtime.output.is_json() {
        let report = json!({
            "results": results,
            "stats": overall,
            "per_tool": runtime.monitor.get_all_stats(),
            "rejected": rejected,
            "default_timeout_ms": runtime.dispatch.default_timeout.as_millis() as u64,
        });
        println!("{}", ConsoleFormatter::format_json(&report));
    } else {
        for result in &results {
            runtime.print_result(result);
        }
        print!(
            "{}",
            ConsoleFormatter::format_stats(&overall, &runtime.monitor.get_all_stats())
        );
        let failures = runtime.monitor.get_recent_failures(None);
        if !failures.is_empty() {
            println!("\n{} most recent failure(s) listed first:", failures.len());
            for record in failures {
                println!(
                    "  {} {}: {}",
                    record.timestamp.format("%H:%M:%S%.3f"),
                    record.tool_name(),
                    record.result.error.as_deref().unwrap_or("")
                );
            }
        }
    }

    let all_ok = rejected == 0 && results.iter().all(|r| r.success);
    Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
