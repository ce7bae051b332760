use std::time::Duration;

use thiserror::Error;

use crate::expr::ParseError;
use crate::scheduler::JobId;

#[derive(Error, Debug)]
pub enum AbacusError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Job queue is closed")]
    QueueClosed,

    #[error("Job queue is full, job {0} rejected")]
    QueueFull(JobId),

    #[error("Result for job {0} was already recorded")]
    DuplicateResult(JobId),

    #[error("Job {0} was never allocated")]
    UnknownJob(JobId),

    #[error("Result for job {0} was lost")]
    ResultLost(JobId),

    #[error("Evaluation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    TransportError(#[from] tonic::transport::Error),
}

pub type Result<T> = std::result::Result<T, AbacusError>;

impl From<AbacusError> for tonic::Status {
    fn from(err: AbacusError) -> Self {
        match err {
            AbacusError::Parse(e) => tonic::Status::invalid_argument(e.to_string()),
            AbacusError::QueueClosed => tonic::Status::unavailable(err.to_string()),
            AbacusError::QueueFull(_) => tonic::Status::resource_exhausted(err.to_string()),
            AbacusError::Timeout(_) => tonic::Status::deadline_exceeded(err.to_string()),
            other => tonic::Status::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AbacusError::from(ParseError::UnexpectedEnd), Code::InvalidArgument),
            (
                AbacusError::from(ParseError::TooDeep { limit: 128 }),
                Code::InvalidArgument,
            ),
            (AbacusError::QueueClosed, Code::Unavailable),
            (AbacusError::QueueFull(3), Code::ResourceExhausted),
            (
                AbacusError::Timeout(Duration::from_millis(50)),
                Code::DeadlineExceeded,
            ),
            (AbacusError::DuplicateResult(1), Code::Internal),
            (AbacusError::UnknownJob(9), Code::Internal),
            (AbacusError::ResultLost(2), Code::Internal),
        ];

        for (err, code) in cases {
            assert_eq!(tonic::Status::from(err).code(), code);
        }
    }

    #[test]
    fn test_parse_error_message_is_passed_through() {
        let status = tonic::Status::from(AbacusError::from(ParseError::TooLarge { limit: 1024 }));
        assert_eq!(status.message(), "expression has more than 1024 operators");
    }
}
