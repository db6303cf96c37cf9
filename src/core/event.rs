use super::types::{EntityId, SimTime};
use serde::{Deserialize, Serialize};

/// Kind of lifecycle event emitted by the simulated processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MachineFailed,
    MachineRestored,
    RepairStarted,
    RepairCompleted,
    CostAccrued,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EventKind::MachineFailed => "machine failed",
            EventKind::MachineRestored => "machine restored",
            EventKind::RepairStarted => "repair started",
            EventKind::RepairCompleted => "repair complete",
            EventKind::CostAccrued => "cost accrued",
        };
        f.write_str(label)
    }
}

/// One (time, kind, entity) entry of the run's lifecycle log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub time: SimTime,
    pub kind: EventKind,
    pub entity: EntityId,
}

impl EventRecord {
    pub fn new(time: SimTime, kind: EventKind, entity: EntityId) -> Self {
        Self { time, kind, entity }
    }
}

impl std::fmt::Display for EventRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>8} {} {}", self.time, self.entity, self.kind)
    }
}
