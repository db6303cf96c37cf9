pub mod config;

pub use config::{ConcurrencyMode, ExecutionConfig};
