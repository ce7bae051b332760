use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::scheduler::{JobQueue, ResultTable};
use crate::worker::executor::JobExecutor;

/// Fixed number of workers draining one [`JobQueue`] into one [`ResultTable`].
pub struct WorkerPool {
    queue: JobQueue,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers on the current tokio runtime. A size of zero still spawns one.
    pub fn spawn(size: usize, queue: JobQueue, table: Arc<ResultTable>) -> Self {
        let size = size.max(1);
        let handles = (1..=size)
            .map(|worker_id| {
                let queue = queue.clone();
                let table = table.clone();
                tokio::spawn(async move {
                    Self::worker_loop(worker_id, queue, table, JobExecutor::new()).await;
                })
            })
            .collect();

        tracing::info!(workers = size, "Worker pool started");
        Self { queue, handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Close the queue and wait for every worker to finish its current job.
    pub async fn shutdown(&mut self) {
        self.queue.close();
        for handle in std::mem::take(&mut self.handles) {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Worker task failed");
            }
        }
        tracing::info!("Worker pool stopped");
    }

    /// Take, execute, record; until the queue closes.
    async fn worker_loop(
        worker_id: usize,
        queue: JobQueue,
        table: Arc<ResultTable>,
        executor: JobExecutor,
    ) {
        tracing::debug!(worker_id, "Worker started");

        while let Some(job) = queue.take().await {
            if table.discard_if_abandoned(job.id) {
                tracing::debug!(worker_id, job_id = job.id, "Skipping abandoned job");
                continue;
            }

            let result = executor.execute(&job).await;
            if let Err(e) = table.record(result.job_id, result.value) {
                tracing::warn!(worker_id, job_id = job.id, error = %e, "Failed to record result");
            }
        }

        tracing::debug!(worker_id, "Worker stopped");
    }
}
