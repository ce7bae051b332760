//! Simulated compute workers.
//!
//! - [`JobExecutor`]: applies one job's operator after its simulated delay
//! - [`WorkerPool`]: fixed set of tasks draining the shared [`JobQueue`](crate::scheduler::JobQueue)
//!
//! # Execution Flow
//!
//! 1. A worker takes the next job from the queue
//! 2. Jobs whose evaluator already gave up are skipped
//! 3. [`JobExecutor::execute`] sleeps for the job's duration, then computes
//! 4. The value is recorded in the [`ResultTable`](crate::scheduler::ResultTable),
//!    which wakes the waiting evaluator

pub mod executor;
pub mod pool;

pub use executor::{compute, ExecutionResult, JobExecutor};
pub use pool::WorkerPool;
