pub mod job;
pub mod queue;
pub mod results;

pub use job::{Job, JobId};
pub use queue::JobQueue;
pub use results::{PendingResult, ResultTable, TableStats};
