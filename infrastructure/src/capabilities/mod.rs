//! Capability adapters
//!
//! Concrete implementations of the application's capability ports, handed
//! to tools through the execution context.

mod browser;
mod local_fs;
mod memory_store;

pub use browser::FixedUrlBrowser;
pub use local_fs::LocalFileSystem;
pub use memory_store::InMemoryMemoryStore;
