use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::error::{AbacusError, Result};
use crate::scheduler::job::Job;

/// Bounded FIFO of jobs shared by every evaluator (producers) and every worker (consumers).
///
/// Cloning is cheap; all clones refer to the same channel.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<Job>,
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    closed: CancellationToken,
}

impl JobQueue {
    /// Capacity is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            closed: CancellationToken::new(),
        }
    }

    /// Enqueue a job, waiting for a free slot while the queue is full.
    pub async fn submit(&self, job: Job) -> Result<()> {
        if self.closed.is_cancelled() {
            return Err(AbacusError::QueueClosed);
        }

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(AbacusError::QueueClosed),
            sent = self.tx.send(job) => sent.map_err(|_| AbacusError::QueueClosed),
        }
    }

    /// Like [`submit`](Self::submit), but gives up with `QueueFull` if no slot frees in time.
    pub async fn submit_timeout(&self, job: Job, timeout: Duration) -> Result<()> {
        let job_id = job.id;
        match tokio::time::timeout(timeout, self.submit(job)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(job_id, timeout = ?timeout, "Job queue full, rejecting job");
                Err(AbacusError::QueueFull(job_id))
            }
        }
    }

    /// Next job in arrival order. Returns `None` once the queue is closed.
    pub async fn take(&self) -> Option<Job> {
        let mut rx = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return None,
            guard = self.rx.lock() => guard,
        };

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => None,
            job = rx.recv() => job,
        }
    }

    /// Stop accepting jobs and wake every blocked producer and consumer. Idempotent.
    pub fn close(&self) {
        if !self.closed.is_cancelled() {
            tracing::info!(pending = self.len(), "Closing job queue");
        }
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    /// Jobs currently waiting for a worker.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}
