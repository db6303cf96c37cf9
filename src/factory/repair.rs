use super::Workshop;
use crate::core::error::SimError;
use crate::core::event::EventKind;
use crate::core::process::{Process, ProcessContext, Suspend};
use crate::core::types::{EntityId, PoolId, StoreId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepairState {
    Requested,
    AwaitingTechnician,
    Repairing,
    Done,
}

/// One repair job: hold a technician for the repair time, then return a
/// spare to the store and free the technician.
///
/// The job only talks to the machine that spawned it through the spares
/// store.
pub struct RepairProcess {
    entity: EntityId,
    technicians: PoolId,
    spares: StoreId,
    state: RepairState,
}

impl RepairProcess {
    pub fn new(machine: usize, failure: u64, technicians: PoolId, spares: StoreId) -> Self {
        Self {
            entity: EntityId::new(format!("repair-{}.{}", machine, failure)),
            technicians,
            spares,
            state: RepairState::Requested,
        }
    }
}

impl Process<Workshop> for RepairProcess {
    fn entity(&self) -> &EntityId {
        &self.entity
    }

    fn resume(&mut self, ctx: &mut ProcessContext<'_, Workshop>) -> Result<Suspend, SimError> {
        match self.state {
            RepairState::Requested => {
                self.state = RepairState::AwaitingTechnician;
                Ok(Suspend::Acquire(self.technicians))
            }
            RepairState::AwaitingTechnician => {
                ctx.record(EventKind::RepairStarted, &self.entity);
                let duration = ctx.state_mut().variates.sample_repair_duration();
                self.state = RepairState::Repairing;
                Ok(Suspend::Timeout(duration))
            }
            RepairState::Repairing => {
                ctx.put(self.spares, 1)?;
                ctx.release(self.technicians)?;
                ctx.record(EventKind::RepairCompleted, &self.entity);
                self.state = RepairState::Done;
                Ok(Suspend::Terminate)
            }
            RepairState::Done => Err(SimError::InvalidResume {
                process: ctx.pid(),
                reason: format!("{} already finished", self.entity),
            }),
        }
    }
}
