use std::sync::Arc;
use std::time::Duration;

use async_recursion::async_recursion;

use crate::config::{OperationTimes, SubtreePolicy};
use crate::error::{AbacusError, Result};
use crate::expr::{ExpressionNode, Operator};
use crate::scheduler::{Job, JobQueue, ResultTable};

/// Turns an expression tree into a value by delegating every operator node to the worker pool.
#[derive(Debug, Clone)]
pub struct TreeEvaluator {
    queue: JobQueue,
    table: Arc<ResultTable>,
    times: OperationTimes,
    policy: SubtreePolicy,
    submit_timeout: Option<Duration>,
}

impl TreeEvaluator {
    pub fn new(queue: JobQueue, table: Arc<ResultTable>, times: OperationTimes) -> Self {
        Self {
            queue,
            table,
            times,
            policy: SubtreePolicy::default(),
            submit_timeout: None,
        }
    }

    pub fn with_policy(mut self, policy: SubtreePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Evaluate `node` depth-first.
    ///
    /// Leaves are returned as-is. For an operator node both children are
    /// resolved first, then one job is submitted for the node itself and its
    /// result awaited. Under [`SubtreePolicy::Sequential`] the left subtree is
    /// finished before the right one starts, so a tree's jobs reach the queue
    /// in post-order.
    ///
    /// Recursion follows the tree, so callers pass trees produced by
    /// [`parse`](crate::expr::parse), whose depth is capped at
    /// [`MAX_DEPTH`](crate::expr::MAX_DEPTH).
    #[async_recursion]
    pub async fn evaluate(&self, node: &ExpressionNode) -> Result<f64> {
        match node {
            ExpressionNode::Literal(value) => Ok(*value),
            ExpressionNode::Binary { op, left, right } => {
                let (lhs, rhs) = match self.policy {
                    SubtreePolicy::Sequential => {
                        let lhs = self.evaluate(left).await?;
                        let rhs = self.evaluate(right).await?;
                        (lhs, rhs)
                    }
                    SubtreePolicy::Parallel => {
                        tokio::try_join!(self.evaluate(left), self.evaluate(right))?
                    }
                };
                self.dispatch(*op, lhs, rhs).await
            }
        }
    }

    /// Submit one job and wait for its result.
    async fn dispatch(&self, op: Operator, lhs: f64, rhs: f64) -> Result<f64> {
        let mut pending = self.table.allocate();
        let symbol = op.symbol();
        let job = Job::new(
            pending.id(),
            lhs,
            rhs,
            symbol,
            self.times.operation_time(symbol),
        );

        tracing::debug!(job_id = job.id, operator = %op, lhs, rhs, "Submitting job");
        match self.submit_timeout {
            Some(timeout) => self.queue.submit_timeout(job, timeout).await?,
            None => self.queue.submit(job).await?,
        }
        pending.mark_submitted();

        tokio::select! {
            biased;
            result = pending.wait() => result,
            _ = self.queue.closed() => Err(AbacusError::QueueClosed),
        }
    }
}
