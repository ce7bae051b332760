use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::error::{AbacusError, Result};
use crate::scheduler::job::JobId;

#[derive(Debug, Default)]
struct TableState {
    last_job_id: JobId,
    results: HashMap<JobId, f64>,
    /// Completion signal per job that has been allocated but not yet recorded.
    waiters: HashMap<JobId, oneshot::Sender<()>>,
    /// Jobs whose evaluator went away before the result arrived.
    abandoned: HashSet<JobId>,
    recorded_total: u64,
}

/// Snapshot of the table for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    /// Results recorded but not yet claimed by their evaluator
    pub unclaimed: usize,
    /// Jobs allocated and still waiting for a result
    pub in_flight: usize,
    pub abandoned: usize,
    pub recorded_total: u64,
}

/// Rendezvous between workers and evaluators, keyed by job id.
///
/// The job id counter lives under the same lock as the results. The lock is
/// only held for single map operations and never across an await.
#[derive(Debug, Default)]
pub struct ResultTable {
    state: Mutex<TableState>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve the next job id and register its completion signal.
    pub fn allocate(self: &Arc<Self>) -> PendingResult {
        let (tx, rx) = oneshot::channel();
        let id = {
            let mut state = self.state();
            state.last_job_id += 1;
            let id = state.last_job_id;
            state.waiters.insert(id, tx);
            id
        };

        PendingResult {
            id,
            table: Arc::clone(self),
            signal: Some(rx),
            submitted: false,
            settled: false,
        }
    }

    /// Store a worker's result and wake the evaluator waiting on it.
    ///
    /// Results for abandoned jobs are dropped silently. Each id can be
    /// recorded at most once.
    pub fn record(&self, id: JobId, value: f64) -> Result<()> {
        let mut state = self.state();

        if state.abandoned.remove(&id) {
            tracing::debug!(job_id = id, "Discarding result of abandoned job");
            return Ok(());
        }
        if id == 0 || id > state.last_job_id {
            return Err(AbacusError::UnknownJob(id));
        }

        let waiter = state
            .waiters
            .remove(&id)
            .ok_or(AbacusError::DuplicateResult(id))?;
        state.results.insert(id, value);
        state.recorded_total += 1;
        // The receiver may already be gone; the result then waits for `take` or abandonment.
        let _ = waiter.send(());
        Ok(())
    }

    /// Remove and return a recorded result.
    pub fn take(&self, id: JobId) -> Option<f64> {
        self.state().results.remove(&id)
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.state().results.contains_key(&id)
    }

    pub fn is_abandoned(&self, id: JobId) -> bool {
        self.state().abandoned.contains(&id)
    }

    /// Clear the abandoned mark of a job a worker is about to skip.
    /// Returns `true` if the job had been abandoned.
    pub fn discard_if_abandoned(&self, id: JobId) -> bool {
        self.state().abandoned.remove(&id)
    }

    pub fn stats(&self) -> TableStats {
        let state = self.state();
        TableStats {
            unclaimed: state.results.len(),
            in_flight: state.waiters.len(),
            abandoned: state.abandoned.len(),
            recorded_total: state.recorded_total,
        }
    }

    fn abandon(&self, id: JobId, submitted: bool) {
        let mut state = self.state();
        let was_waiting = state.waiters.remove(&id).is_some();
        let had_result = state.results.remove(&id).is_some();

        // Only a submitted, unfinished job can still reach a worker.
        if submitted && was_waiting && !had_result {
            state.abandoned.insert(id);
        }
        tracing::debug!(job_id = id, submitted, had_result, "Job abandoned by evaluator");
    }
}

/// Evaluator-side handle for one outstanding job.
///
/// Dropping it before [`wait`](Self::wait) completes abandons the job: any
/// recorded result is removed and a late result is discarded by the worker.
#[derive(Debug)]
pub struct PendingResult {
    id: JobId,
    table: Arc<ResultTable>,
    signal: Option<oneshot::Receiver<()>>,
    submitted: bool,
    settled: bool,
}

impl PendingResult {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Note that the job reached the queue, so a worker may still pick it up.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    /// Wait for this job's result, then claim it from the table.
    pub async fn wait(mut self) -> Result<f64> {
        let signal = self.signal.take().ok_or(AbacusError::ResultLost(self.id))?;
        signal.await.map_err(|_| AbacusError::ResultLost(self.id))?;

        let value = self
            .table
            .take(self.id)
            .ok_or(AbacusError::ResultLost(self.id))?;
        self.settled = true;
        Ok(value)
    }
}

impl Drop for PendingResult {
    fn drop(&mut self) {
        if !self.settled {
            self.table.abandon(self.id, self.submitted);
        }
    }
}
