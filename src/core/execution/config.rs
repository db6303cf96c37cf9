//! Configuration for running independent simulation replications
//!
//! A single simulation is always cooperative and single-threaded; these
//! settings only decide how separate replications are spread over threads.

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications run in parallel on a Rayon thread pool
    Rayon,
}

/// Configuration for replication execution
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ExecutionConfig {
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon; `None` uses the global pool
    pub thread_pool_size: Option<usize>,
}

impl ExecutionConfig {
    /// Create a new execution configuration with default values
    ///
    /// Default configuration uses Sequential mode with no thread pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency mode for the replications
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}
