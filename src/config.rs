use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_OPERATION_TIME_MS: u64 = 1000;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Simulated cost of each arithmetic operation, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTimes {
    pub addition_ms: u64,
    pub subtraction_ms: u64,
    pub multiplication_ms: u64,
    pub division_ms: u64,
}

impl Default for OperationTimes {
    fn default() -> Self {
        Self::uniform(DEFAULT_OPERATION_TIME_MS)
    }
}

impl OperationTimes {
    /// Same duration for every operator.
    pub fn uniform(ms: u64) -> Self {
        Self {
            addition_ms: ms,
            subtraction_ms: ms,
            multiplication_ms: ms,
            division_ms: ms,
        }
    }

    /// Duration a worker spends on an operator symbol. Unknown symbols get the default.
    pub fn operation_time(&self, symbol: char) -> Duration {
        let ms = match symbol {
            '+' => self.addition_ms,
            '-' => self.subtraction_ms,
            '*' => self.multiplication_ms,
            '/' => self.division_ms,
            _ => DEFAULT_OPERATION_TIME_MS,
        };
        Duration::from_millis(ms)
    }
}

/// How the evaluator resolves the two children of an operator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubtreePolicy {
    /// Left subtree fully resolved before the right one is touched.
    /// Jobs of one tree are submitted in post-order.
    #[default]
    Sequential,
    /// Both subtrees resolved concurrently. Submission order is not guaranteed.
    Parallel,
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub listen_addr: SocketAddr,
    pub computing_power: usize,
    pub queue_capacity: usize,
    pub operation_times: OperationTimes,
    /// Reject a job when the queue stays full for this long. `None` blocks indefinitely.
    pub submit_timeout_ms: Option<u64>,
    /// Upper bound on one whole evaluation. `None` waits for completion.
    pub request_timeout_ms: Option<u64>,
    pub subtree_policy: SubtreePolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 50051)),
            computing_power: 1,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            operation_times: OperationTimes::default(),
            submit_timeout_ms: None,
            request_timeout_ms: None,
            subtree_policy: SubtreePolicy::Sequential,
        }
    }
}

impl AgentConfig {
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }

    /// Values below one are coerced to a single worker.
    pub fn with_computing_power(mut self, workers: i64) -> Self {
        self.computing_power = coerce_computing_power(workers);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_operation_times(mut self, times: OperationTimes) -> Self {
        self.operation_times = times;
        self
    }

    pub fn with_submit_timeout_ms(mut self, ms: u64) -> Self {
        self.submit_timeout_ms = Some(ms);
        self
    }

    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = Some(ms);
        self
    }

    pub fn with_subtree_policy(mut self, policy: SubtreePolicy) -> Self {
        self.subtree_policy = policy;
        self
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_ms.map(Duration::from_millis)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

pub fn coerce_computing_power(workers: i64) -> usize {
    if workers <= 0 {
        1
    } else {
        workers as usize
    }
}

/// Server options, read from flags with environment fallbacks.
#[derive(clap::Args, Debug, Clone)]
pub struct AgentArgs {
    /// Port to listen on for gRPC
    #[arg(long, env = "ABACUS_PORT", default_value = "50051")]
    pub port: u16,

    /// Number of concurrent workers (values below 1 are treated as 1)
    #[arg(
        long,
        env = "COMPUTING_POWER",
        default_value = "1",
        allow_negative_numbers = true
    )]
    pub computing_power: i64,

    /// Maximum number of jobs waiting for a worker
    #[arg(long, env = "QUEUE_CAPACITY", default_value = "100")]
    pub queue_capacity: usize,

    /// Simulated duration of an addition
    #[arg(long, env = "TIME_ADDITION_MS", default_value = "1000")]
    pub time_addition_ms: u64,

    /// Simulated duration of a subtraction
    #[arg(long, env = "TIME_SUBTRACTION_MS", default_value = "1000")]
    pub time_subtraction_ms: u64,

    /// Simulated duration of a multiplication
    #[arg(long, env = "TIME_MULTIPLICATION_MS", default_value = "1000")]
    pub time_multiplication_ms: u64,

    /// Simulated duration of a division
    #[arg(long, env = "TIME_DIVISION_MS", default_value = "1000")]
    pub time_division_ms: u64,

    /// Reject jobs when the queue stays full this long (blocks when unset)
    #[arg(long, env = "SUBMIT_TIMEOUT_MS")]
    pub submit_timeout_ms: Option<u64>,

    /// Abort an evaluation after this many milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Resolve sibling subtrees concurrently
    #[arg(long, env = "PARALLEL_SUBTREES")]
    pub parallel_subtrees: bool,
}

impl AgentArgs {
    pub fn into_config(self) -> AgentConfig {
        let policy = if self.parallel_subtrees {
            SubtreePolicy::Parallel
        } else {
            SubtreePolicy::Sequential
        };

        AgentConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], self.port)),
            computing_power: coerce_computing_power(self.computing_power),
            queue_capacity: self.queue_capacity.max(1),
            operation_times: OperationTimes {
                addition_ms: self.time_addition_ms,
                subtraction_ms: self.time_subtraction_ms,
                multiplication_ms: self.time_multiplication_ms,
                division_ms: self.time_division_ms,
            },
            submit_timeout_ms: self.submit_timeout_ms,
            request_timeout_ms: self.request_timeout_ms,
            subtree_policy: policy,
        }
    }
}
