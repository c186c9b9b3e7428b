//! Tool Monitor
//!
//! Bounded, insertion-ordered history of [`ExecutionResult`]s with derived
//! statistics. When the history grows past its cap the oldest records are
//! evicted first, on every insertion and whenever the cap is lowered.
//!
//! The monitor is shared (`Arc<ToolMonitor>`) between the scheduler, which
//! records into it, and whoever reads diagnostics, so its state sits behind a
//! mutex.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use dispatch_domain::ExecutionResult;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;

/// An execution result plus the time it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorRecord {
    #[serde(flatten)]
    pub result: ExecutionResult,
    pub timestamp: DateTime<Utc>,
}

impl MonitorRecord {
    pub fn tool_name(&self) -> &str {
        self.result.tool_name()
    }
}

/// Aggregates over a set of records.
///
/// An empty set yields zero counters and no min/max.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub avg_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<u64>,
}

impl ExecutionStats {
    fn from_records<'a>(records: impl Iterator<Item = &'a MonitorRecord>) -> Self {
        let mut stats = ExecutionStats::default();
        let mut total_duration: u64 = 0;

        for record in records {
            stats.total += 1;
            if record.result.success {
                stats.successful += 1;
            }
            let d = record.result.duration_ms;
            total_duration += d;
            stats.min_duration = Some(stats.min_duration.map_or(d, |m| m.min(d)));
            stats.max_duration = Some(stats.max_duration.map_or(d, |m| m.max(d)));
        }

        stats.failed = stats.total - stats.successful;
        if stats.total > 0 {
            stats.success_rate = stats.successful as f64 / stats.total as f64;
            stats.avg_duration = total_duration as f64 / stats.total as f64;
        }
        stats
    }
}

#[derive(Debug)]
struct MonitorState {
    records: VecDeque<MonitorRecord>,
    max_records: usize,
}

impl MonitorState {
    fn evict(&mut self) {
        while self.records.len() > self.max_records {
            self.records.pop_front();
        }
    }

    fn filtered<'a>(&'a self, name: Option<&'a str>) -> impl Iterator<Item = &'a MonitorRecord> {
        self.records
            .iter()
            .filter(move |r| name.is_none_or(|n| r.tool_name() == n))
    }
}

/// Bounded execution history.
#[derive(Debug)]
pub struct ToolMonitor {
    state: Mutex<MonitorState>,
    recent_failures_limit: usize,
}

impl Default for ToolMonitor {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}

impl ToolMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            state: Mutex::new(MonitorState {
                records: VecDeque::new(),
                max_records: config.max_monitor_records,
            }),
            recent_failures_limit: config.recent_failures_limit,
        }
    }

    pub fn with_max_records(self, max: usize) -> Self {
        self.set_max_records(max);
        self
    }

    /// Append a result stamped with the current time, evicting the oldest
    /// records beyond the cap.
    pub fn record(&self, result: ExecutionResult) {
        let mut state = self.state.lock();
        state.records.push_back(MonitorRecord {
            result,
            timestamp: Utc::now(),
        });
        state.evict();
    }

    /// Records in chronological order, optionally filtered by exact tool
    /// name, keeping only the most recent `limit`.
    pub fn get_history(&self, name: Option<&str>, limit: Option<usize>) -> Vec<MonitorRecord> {
        let state = self.state.lock();
        let matching: Vec<&MonitorRecord> = state.filtered(name).collect();
        let skip = limit.map_or(0, |l| matching.len().saturating_sub(l));
        matching.into_iter().skip(skip).cloned().collect()
    }

    pub fn get_stats(&self, name: Option<&str>) -> ExecutionStats {
        let state = self.state.lock();
        ExecutionStats::from_records(state.filtered(name))
    }

    /// Stats for every distinct tool name in the history.
    pub fn get_all_stats(&self) -> BTreeMap<String, ExecutionStats> {
        let state = self.state.lock();
        let mut grouped: BTreeMap<String, Vec<&MonitorRecord>> = BTreeMap::new();
        for record in &state.records {
            grouped
                .entry(record.tool_name().to_string())
                .or_default()
                .push(record);
        }
        grouped
            .into_iter()
            .map(|(name, records)| (name, ExecutionStats::from_records(records.into_iter())))
            .collect()
    }

    /// Most recent failures first, at most `limit` (host default when `None`).
    pub fn get_recent_failures(&self, limit: Option<usize>) -> Vec<MonitorRecord> {
        let limit = limit.unwrap_or(self.recent_failures_limit);
        let state = self.state.lock();
        state
            .records
            .iter()
            .rev()
            .filter(|r| !r.result.success)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Change the cap; shrinking evicts immediately.
    pub fn set_max_records(&self, max: usize) {
        let mut state = self.state.lock();
        state.max_records = max;
        state.evict();
    }

    pub fn max_records(&self) -> usize {
        self.state.lock().max_records
    }

    pub fn clear(&self) {
        self.state.lock().records.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }
}
