use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::AgentConfig;
use crate::error::{AbacusError, Result};
use crate::evaluator::TreeEvaluator;
use crate::expr;
use crate::scheduler::{JobQueue, ResultTable, TableStats};
use crate::worker::WorkerPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub request_id: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub request_id: String,
    /// Fixed-point rendering, see [`format_result`].
    pub result: String,
}

/// Fixed-point rendering with six decimals (`14.000000`).
/// Non-finite values render as `+Inf`, `-Inf` and `NaN`.
pub fn format_result(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{:.6}", value)
    }
}

/// Owns the job queue, the result table and the worker pool for the process lifetime.
///
/// Construct once at startup and share it (behind an `Arc`) with every caller.
pub struct EvaluationService {
    config: AgentConfig,
    queue: JobQueue,
    table: Arc<ResultTable>,
    evaluator: TreeEvaluator,
    pool: Mutex<WorkerPool>,
}

impl EvaluationService {
    /// Create the shared state and spawn the workers. Must be called inside a tokio runtime.
    pub fn new(config: AgentConfig) -> Self {
        let queue = JobQueue::new(config.queue_capacity);
        let table = Arc::new(ResultTable::new());
        let pool = WorkerPool::spawn(config.computing_power, queue.clone(), table.clone());
        let evaluator = TreeEvaluator::new(queue.clone(), table.clone(), config.operation_times)
            .with_policy(config.subtree_policy)
            .with_submit_timeout(config.submit_timeout());

        tracing::info!(
            computing_power = pool.size(),
            queue_capacity = queue.capacity(),
            policy = ?config.subtree_policy,
            "Evaluation service ready"
        );

        Self {
            config,
            queue,
            table,
            evaluator,
            pool: Mutex::new(pool),
        }
    }

    /// Parse and evaluate one expression, returning once every job it needs has completed.
    ///
    /// A parse failure is returned unchanged and submits no job.
    pub async fn evaluate(&self, request_id: &str, expression: &str) -> Result<EvaluationResult> {
        let tree = expr::parse(expression).map_err(|e| {
            tracing::debug!(request_id, error = %e, "Rejecting malformed expression");
            AbacusError::from(e)
        })?;

        let started = Instant::now();
        let jobs = tree.internal_node_count();
        tracing::debug!(request_id, jobs, "Evaluating expression");

        let value = match self.config.request_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.evaluator.evaluate(&tree))
                .await
                .map_err(|_| {
                    tracing::warn!(request_id, timeout = ?limit, "Evaluation timed out");
                    AbacusError::Timeout(limit)
                })??,
            None => self.evaluator.evaluate(&tree).await?,
        };

        let result = format_result(value);
        tracing::info!(
            request_id,
            jobs,
            result = %result,
            elapsed = ?started.elapsed(),
            "Expression evaluated"
        );

        Ok(EvaluationResult {
            request_id: request_id.to_string(),
            result,
        })
    }

    pub async fn evaluate_request(&self, request: &EvaluationRequest) -> Result<EvaluationResult> {
        self.evaluate(&request.request_id, &request.expression).await
    }

    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Close the queue and join the workers. Pending evaluations fail with `QueueClosed`.
    pub async fn shutdown(&self) {
        tracing::info!(stats = ?self.table.stats(), "Shutting down evaluation service");
        self.pool.lock().await.shutdown().await;
    }
}
