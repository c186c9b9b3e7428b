//! Tool Scheduler
//!
//! Routes invocations into per-group FIFO queues so that tools sharing a
//! resource group never run concurrently, while different groups proceed in
//! parallel. Callers never manage locks themselves.
//!
//! ```text
//!            ┌─ "browser" ─▶ [job, job, job] ─▶ worker ─┐
//! execute ───┼─ "fs"      ─▶ [job]           ─▶ worker ─┼─▶ ToolExecutor
//!            └─ "default" ─▶ []              ─▶ worker ─┘
//! ```
//!
//! Each group gets one worker task, spawned lazily on first use and fed
//! through an unbounded channel. A worker runs one job at a time, so
//! completion order within a group equals submission order.
//!
//! Grouping is a cooperative contract: it only serialises tools that were
//! given the same group label. It does not lock the capabilities themselves.
//!
//! # Lifecycle
//!
//! | Operation | Queued work | Group bookkeeping |
//! |-----------|-------------|-------------------|
//! | [`shutdown`](ToolScheduler::shutdown) | awaited to completion | removed afterwards |
//! | [`clear`](ToolScheduler::clear) | left to finish on detached workers | removed immediately |

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dispatch_domain::{DispatchError, ExecutionResult, ToolCallRecord, ToolError};
use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::DispatchConfig;
use crate::context::ExecutionContext;
use crate::executor::{BatchItem, ExecutionOptions, ToolExecutor};
use crate::monitor::ToolMonitor;
use crate::ports::ExecutionSink;
use crate::tool::Tool;

/// Snapshot of one group's queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    /// Jobs waiting behind the current one
    pub pending: usize,
    /// Whether a job is executing right now
    pub running: bool,
}

struct Job {
    tool: Arc<Tool>,
    params: Map<String, Value>,
    context: ExecutionContext,
    options: ExecutionOptions,
    reply: oneshot::Sender<ExecutionResult>,
}

#[derive(Default)]
struct Counters {
    pending: AtomicUsize,
    running: AtomicBool,
}

struct GroupQueue {
    name: String,
    sender: mpsc::UnboundedSender<Job>,
    counters: Arc<Counters>,
    worker: JoinHandle<()>,
}

impl GroupQueue {
    fn status(&self) -> QueueStatus {
        QueueStatus {
            pending: self.counters.pending.load(Ordering::SeqCst),
            running: self.counters.running.load(Ordering::SeqCst),
        }
    }
}

/// Everything a worker needs besides its channel.
#[derive(Clone)]
struct WorkerShared {
    executor: Arc<ToolExecutor>,
    monitor: Option<Arc<ToolMonitor>>,
    sink: Option<Arc<dyn ExecutionSink>>,
}

/// Per-group serialising scheduler.
pub struct ToolScheduler {
    shared: WorkerShared,
    default_group: String,
    /// Groups in first-use order
    queues: Mutex<Vec<GroupQueue>>,
}

impl Default for ToolScheduler {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}

impl ToolScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            shared: WorkerShared {
                executor: Arc::new(ToolExecutor::from_config(config)),
                monitor: None,
                sink: None,
            },
            default_group: config.default_group.clone(),
            queues: Mutex::new(Vec::new()),
        }
    }

    /// Record every completed result into `monitor`.
    ///
    /// Applies to groups created after this call.
    pub fn with_monitor(mut self, monitor: Arc<ToolMonitor>) -> Self {
        self.shared.monitor = Some(monitor);
        self
    }

    /// Forward every completed result to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ExecutionSink>) -> Self {
        self.shared.sink = Some(sink);
        self
    }

    pub fn with_executor(mut self, executor: ToolExecutor) -> Self {
        self.shared.executor = Arc::new(executor);
        self
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    pub fn monitor(&self) -> Option<&Arc<ToolMonitor>> {
        self.shared.monitor.as_ref()
    }

    /// Queue one invocation on its tool's group and wait for the result.
    pub async fn execute(
        &self,
        tool: Arc<Tool>,
        params: Map<String, Value>,
        context: &ExecutionContext,
    ) -> ExecutionResult {
        self.execute_with_options(tool, params, context, &ExecutionOptions::default())
            .await
    }

    pub async fn execute_with_options(
        &self,
        tool: Arc<Tool>,
        params: Map<String, Value>,
        context: &ExecutionContext,
        options: &ExecutionOptions,
    ) -> ExecutionResult {
        let group = tool.definition().group_or(&self.default_group).to_string();
        let name = tool.name().to_string();
        let fallback_params = params.clone();
        let (reply, receiver) = oneshot::channel();

        self.enqueue(
            &group,
            Job {
                tool,
                params,
                context: context.clone(),
                options: options.clone(),
                reply,
            },
        );

        match receiver.await {
            Ok(result) => result,
            Err(_) => {
                warn!(tool = %name, group = %group, "Worker stopped before replying");
                let error = DispatchError::ExecutionFailed {
                    tool: name.clone(),
                    source: ToolError::execution_failed(format!(
                        "Worker for group \"{}\" stopped before completing the call",
                        group
                    )),
                };
                ExecutionResult::failure(ToolCallRecord::new(name, fallback_params), &error, 0, 0)
            }
        }
    }

    /// Fan items out by group and wait for all of them.
    ///
    /// Same-group items keep their relative order and run one after another;
    /// different groups run concurrently. Results come back in input order.
    pub async fn execute_batch(
        &self,
        items: Vec<BatchItem>,
        context: &ExecutionContext,
        options: &ExecutionOptions,
    ) -> Vec<ExecutionResult> {
        let total = items.len();
        let mut grouped: Vec<(String, Vec<(usize, BatchItem)>)> = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            let group = item.tool.definition().group_or(&self.default_group).to_string();
            match grouped.iter_mut().find(|(g, _)| *g == group) {
                Some((_, entries)) => entries.push((index, item)),
                None => grouped.push((group, vec![(index, item)])),
            }
        }

        let group_runs = grouped.into_iter().map(|(_, entries)| async move {
            let mut results = Vec::with_capacity(entries.len());
            for (index, item) in entries {
                let result = self
                    .execute_with_options(item.tool, item.params, context, options)
                    .await;
                results.push((index, result));
            }
            results
        });

        let mut ordered: Vec<Option<ExecutionResult>> = vec![None; total];
        for (index, result) in join_all(group_runs).await.into_iter().flatten() {
            ordered[index] = Some(result);
        }
        ordered.into_iter().flatten().collect()
    }

    /// Every group used since the last `shutdown`/`clear`, in first-use order.
    pub fn get_groups(&self) -> Vec<String> {
        self.queues.lock().iter().map(|q| q.name.clone()).collect()
    }

    /// `None` when the group was never used or has been cleared.
    pub fn get_queue_status(&self, group: &str) -> Option<QueueStatus> {
        self.queues
            .lock()
            .iter()
            .find(|q| q.name == group)
            .map(GroupQueue::status)
    }

    /// Wait for every queued and in-flight job, then forget all groups.
    pub async fn shutdown(&self) {
        let queues: Vec<GroupQueue> = std::mem::take(&mut *self.queues.lock());
        debug!(groups = queues.len(), "Shutting down scheduler");

        let workers = queues.into_iter().map(|queue| {
            // Closing the channel lets the worker exit once it has drained.
            drop(queue.sender);
            queue.worker
        });
        for joined in join_all(workers).await {
            if let Err(e) = joined {
                warn!(error = %e, "Scheduler worker ended abnormally");
            }
        }
    }

    /// Forget all groups immediately.
    ///
    /// Jobs already submitted still run to completion on their (now detached)
    /// workers and their callers still receive results. A job submitted to the
    /// same group after `clear` starts a fresh worker, which may run
    /// concurrently with a detached job of that group still in flight.
    pub fn clear(&self) {
        let dropped = std::mem::take(&mut *self.queues.lock());
        debug!(groups = dropped.len(), "Cleared scheduler groups");
    }

    fn enqueue(&self, group: &str, job: Job) {
        let mut queues = self.queues.lock();
        let index = match queues.iter().position(|q| q.name == group) {
            Some(index) => index,
            None => {
                queues.push(self.spawn_queue(group));
                queues.len() - 1
            }
        };

        let queue = &queues[index];
        queue.counters.pending.fetch_add(1, Ordering::SeqCst);
        if let Err(mpsc::error::SendError(job)) = queue.sender.send(job) {
            // The worker is gone (it panicked); replace it and resubmit.
            warn!(group = %group, "Restarting scheduler worker");
            let replacement = self.spawn_queue(group);
            replacement.counters.pending.fetch_add(1, Ordering::SeqCst);
            if let Err(mpsc::error::SendError(job)) = replacement.sender.send(job) {
                drop(job.reply);
            }
            queues[index] = replacement;
        }
    }

    fn spawn_queue(&self, group: &str) -> GroupQueue {
        let (sender, receiver) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        let worker = tokio::spawn(run_worker(
            group.to_string(),
            receiver,
            counters.clone(),
            self.shared.clone(),
        ));
        debug!(group = %group, "Created group queue");

        GroupQueue {
            name: group.to_string(),
            sender,
            counters,
            worker,
        }
    }
}

impl std::fmt::Debug for ToolScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolScheduler")
            .field("default_group", &self.default_group)
            .field("groups", &self.get_groups())
            .finish_non_exhaustive()
    }
}

async fn run_worker(
    group: String,
    mut receiver: mpsc::UnboundedReceiver<Job>,
    counters: Arc<Counters>,
    shared: WorkerShared,
) {
    while let Some(job) = receiver.recv().await {
        counters.running.store(true, Ordering::SeqCst);
        counters.pending.fetch_sub(1, Ordering::SeqCst);
        debug!(group = %group, tool = %job.tool.name(), "Dequeued job");

        let result = shared
            .executor
            .execute(&job.tool, job.params, &job.context, &job.options)
            .await;
        counters.running.store(false, Ordering::SeqCst);

        if let Some(monitor) = &shared.monitor {
            monitor.record(result.clone());
        }
        if let Some(sink) = &shared.sink {
            sink.on_result(&result);
        }
        // The caller may have stopped waiting; that is not an error.
        let _ = job.reply.send(result);
    }
    debug!(group = %group, "Group worker finished");
}
