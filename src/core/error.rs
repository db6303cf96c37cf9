use super::types::{PoolId, ProcessId, SimTime, StoreId};

/// Errors raised by the simulation engine and its shared resources.
///
/// Steady-state behaviour (failures, queuing, waiting) is never an error;
/// every variant here is either a setup mistake or a logic error in a process.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A timeout was requested with a negative or non-finite delay
    #[error("invalid delay {delay}: delays must be finite and non-negative")]
    InvalidDelay { delay: f64 },

    /// `run` was asked to stop at a time earlier than the current clock
    #[error("horizon {until} lies before the current clock {now}")]
    InvalidHorizon { until: SimTime, now: SimTime },

    /// An event referenced a process that is not registered
    #[error("process {0} is not registered with the engine")]
    UnknownProcess(ProcessId),

    #[error("resource pool {0:?} does not exist")]
    UnknownPool(PoolId),

    #[error("inventory store {0:?} does not exist")]
    UnknownStore(StoreId),

    /// A resource pool or store was created with an unusable shape
    #[error("invalid resource: {0}")]
    InvalidResource(String),

    /// `put` would push the store level above its capacity
    #[error("put of {amount} would overflow store (level {level}, capacity {capacity})")]
    StoreOverflow { amount: u64, level: u64, capacity: u64 },

    /// `get` asked for more than the store can ever hold
    #[error("get of {amount} can never be satisfied by a store of capacity {capacity}")]
    UnsatisfiableGet { amount: u64, capacity: u64 },

    /// `release` was called on a pool with no slot in use
    #[error("release on pool {0:?} without a matching acquire")]
    ReleaseWithoutAcquire(PoolId),

    /// A process was resumed in a state it cannot continue from
    #[error("process {process} cannot resume: {reason}")]
    InvalidResume { process: ProcessId, reason: String },

    /// A cost charge was negative or non-finite
    #[error("invalid cost charge {amount}")]
    InvalidCharge { amount: f64 },

    #[error("configuration error: {0}")]
    Config(#[from] crate::factory::config::ConfigError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}
