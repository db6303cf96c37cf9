use super::config::FactoryConfig;
use super::cost::{CostAccumulator, CostBreakdown, CostSample};
use crate::core::event::{EventKind, EventRecord};
use crate::core::resources::{InventoryStore, ResourcePool};
use crate::core::simulation_engine::RunOutcome;
use crate::core::types::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Final state of a resource at the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub capacity: u64,
    /// Slots in use for a pool, stock level for a store
    pub held: u64,
    pub waiting: usize,
}

/// Everything a run produced, readable after the engine is gone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Label for this run; not part of the deterministic output
    pub run_id: Uuid,
    pub seed: u64,
    pub horizon: SimTime,
    pub outcome: RunOutcome,
    pub costs: CostBreakdown,
    pub total_cost: f64,
    pub technicians: ResourceSnapshot,
    pub spares: ResourceSnapshot,
    pub spares_handed_out: u64,
    pub spares_returned: u64,
    pub events_processed: u64,
    pub cost_history: Vec<CostSample>,
    pub records: Vec<EventRecord>,
}

impl RunReport {
    pub(crate) fn new(
        config: &FactoryConfig,
        outcome: RunOutcome,
        costs: &CostAccumulator,
        technicians: &ResourcePool,
        spares: &InventoryStore,
        events_processed: u64,
        records: Vec<EventRecord>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            seed: config.seed,
            horizon: SimTime(config.horizon),
            outcome,
            costs: costs.breakdown(),
            total_cost: costs.total(),
            technicians: ResourceSnapshot {
                capacity: technicians.capacity(),
                held: technicians.in_use(),
                waiting: technicians.queue_len(),
            },
            spares: ResourceSnapshot {
                capacity: spares.capacity(),
                held: spares.level(),
                waiting: spares.queue_len(),
            },
            spares_handed_out: spares.total_got(),
            spares_returned: spares.total_put(),
            events_processed,
            cost_history: costs.history().to_vec(),
            records,
        }
    }

    /// Number of records of the given kind
    pub fn count(&self, kind: EventKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    /// The (time, kind) sequence, which is fully determined by config and seed
    pub fn timeline(&self) -> Vec<(SimTime, EventKind)> {
        self.records.iter().map(|r| (r.time, r.kind)).collect()
    }

    /// Human-readable end-of-run summary
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {} (seed {})", self.run_id, self.seed)?;
        writeln!(f, "  horizon:            {}", self.horizon)?;
        writeln!(f, "  outcome:            {:?}", self.outcome)?;
        writeln!(f, "  machine failures:   {}", self.count(EventKind::MachineFailed))?;
        writeln!(f, "  machines restored:  {}", self.count(EventKind::MachineRestored))?;
        writeln!(f, "  repairs completed:  {}", self.count(EventKind::RepairCompleted))?;
        writeln!(
            f,
            "  technicians busy:   {}/{} ({} waiting)",
            self.technicians.held, self.technicians.capacity, self.technicians.waiting
        )?;
        writeln!(
            f,
            "  spares on hand:     {}/{} ({} waiting)",
            self.spares.held, self.spares.capacity, self.spares.waiting
        )?;
        writeln!(f, "  labor cost:         {:.2}", self.costs.labor)?;
        writeln!(f, "  spares holding:     {:.2}", self.costs.spares_holding)?;
        writeln!(f, "  downtime penalty:   {:.2}", self.costs.downtime)?;
        write!(f, "  total cost:         {:.2}", self.total_cost)
    }
}
