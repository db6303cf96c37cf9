//! The repair-shop scenario: machines that fail, technicians that repair
//! them, a spares store between the two, and the cost of running it all.

pub mod config;
pub mod cost;
pub mod machine;
pub mod repair;
pub mod replication;
pub mod report;
pub mod scenario;
pub mod variates;

use config::CostRates;
use cost::CostAccumulator;
use variates::VariateSource;

/// Shared state reachable from every repair-shop process
pub struct Workshop {
    pub variates: Box<dyn VariateSource>,
    pub costs: CostAccumulator,
    pub rates: CostRates,
}

impl Workshop {
    pub fn new(variates: Box<dyn VariateSource>, rates: CostRates) -> Self {
        Self {
            variates,
            costs: CostAccumulator::new(),
            rates,
        }
    }
}
