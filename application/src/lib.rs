//! Application layer for tool-dispatch
//!
//! Registry, injection, execution, scheduling and monitoring of tools, plus
//! the ports capability adapters implement. Depends only on the domain layer.

pub mod config;
pub mod context;
pub mod domain_guard;
pub mod executor;
pub mod injector;
pub mod monitor;
pub mod policy;
pub mod ports;
pub mod registry;
pub mod scheduler;
pub mod tool;

// Re-export commonly used types
pub use config::DispatchConfig;
pub use context::{
    ContextOptions, ContextValue, ExecutionContext, ExecutionContextManager, ToolLogger,
};
pub use domain_guard::DomainGuard;
pub use executor::{BatchItem, ExecutionOptions, ToolExecutor};
pub use injector::{InjectionCheck, ParamInjector};
pub use monitor::{ExecutionStats, MonitorRecord, ToolMonitor};
pub use policy::{
    DomainRule, PermissionResult, PolicyBuilder, PolicyConfig, PolicyLayer, PolicyResolver,
    RuleAction,
};
pub use ports::{
    BrowserSession, CompositeSink, ExecutionSink, FileSystem, LlmClient, MemoryStore,
    NoExecutionSink,
};
pub use registry::ToolRegistry;
pub use scheduler::{QueueStatus, ToolScheduler};
pub use tool::{FnHandler, Tool, ToolHandler, ToolInput};
