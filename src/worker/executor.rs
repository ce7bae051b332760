use std::time::{Duration, Instant};

use crate::expr::Operator;
use crate::scheduler::{Job, JobId};

/// Result of job execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub job_id: JobId,
    pub value: f64,
    pub elapsed: Duration,
}

/// Apply a job's operator to its operands.
///
/// Division by zero follows IEEE-754 (`inf`, `-inf` or `NaN`). An unknown
/// operator symbol yields `0.0` instead of failing the worker.
pub fn compute(job: &Job) -> f64 {
    match Operator::from_symbol(job.operator) {
        Some(op) => op.apply(job.left, job.right),
        None => {
            tracing::warn!(
                job_id = job.id,
                operator = %job.operator,
                "Unknown operator, defaulting result to 0"
            );
            0.0
        }
    }
}

/// Executes jobs with an artificial delay modelling the cost of the operation.
#[derive(Debug, Clone, Default)]
pub struct JobExecutor;

impl JobExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Sleep for the job's simulated duration, then compute it.
    pub async fn execute(&self, job: &Job) -> ExecutionResult {
        tracing::debug!(
            job_id = job.id,
            operator = %job.operator,
            left = job.left,
            right = job.right,
            duration_ms = job.duration.as_millis() as u64,
            "Executing job"
        );

        let started = Instant::now();
        tokio::time::sleep(job.duration).await;
        let value = compute(job);
        let elapsed = started.elapsed();

        tracing::debug!(job_id = job.id, value, elapsed = ?elapsed, "Job completed");

        ExecutionResult {
            job_id: job.id,
            value,
            elapsed,
        }
    }
}
