//! Application-level configuration.
//!
//! - [`DispatchConfig`] — host-wide dispatch defaults (timeout, retry delay,
//!   default group, monitor capacity)

pub mod dispatch_config;

pub use dispatch_config::{DEFAULT_GROUP, DispatchConfig};
