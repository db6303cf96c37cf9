pub mod core;
pub mod factory;

// Re-export commonly used types
pub use crate::core::error::SimError;
pub use crate::core::event::{EventKind, EventRecord};
pub use crate::core::process::{Process, ProcessContext, Suspend};
pub use crate::core::simulation_engine::{RunOutcome, SimulationEngine, SimulationObserver};
pub use crate::core::types::{EntityId, PoolId, ProcessId, SimTime, StoreId};
pub use crate::factory::config::FactoryConfig;
pub use crate::factory::report::RunReport;
pub use crate::factory::scenario::run_scenario;
