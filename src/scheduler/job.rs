use std::time::Duration;

pub type JobId = u64;

/// One binary operation with both operands already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub left: f64,
    pub right: f64,
    /// Raw operator symbol. Workers treat anything outside `+ - * /` as yielding zero.
    pub operator: char,
    pub duration: Duration,
}

impl Job {
    pub fn new(id: JobId, left: f64, right: f64, operator: char, duration: Duration) -> Self {
        Self {
            id,
            left,
            right,
            operator,
            duration,
        }
    }
}
