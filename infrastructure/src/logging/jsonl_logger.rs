//! JSONL file writer for execution results.
//!
//! Each [`ExecutionResult`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use dispatch_application::ExecutionSink;
use dispatch_domain::ExecutionResult;
use parking_lot::Mutex;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const EVENT_TYPE: &str = "tool_execution";

/// Append-only JSONL log of execution results.
///
/// Flushes after every line and on `Drop`.
pub struct JsonlExecutionLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlExecutionLog {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create execution log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open execution log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExecutionSink for JsonlExecutionLog {
    fn on_result(&self, result: &ExecutionResult) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(Value::Object(mut map)) = serde_json::to_value(result) else {
            return;
        };
        map.insert("type".to_string(), Value::String(EVENT_TYPE.to_string()));
        map.insert("timestamp".to_string(), Value::String(timestamp));

        let Ok(line) = serde_json::to_string(&map) else {
            return;
        };

        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }
}

impl Drop for JsonlExecutionLog {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}

impl std::fmt::Debug for JsonlExecutionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlExecutionLog")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
