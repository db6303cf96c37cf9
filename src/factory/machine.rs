use super::cost::CostCategory;
use super::repair::RepairProcess;
use super::Workshop;
use crate::core::error::SimError;
use crate::core::event::EventKind;
use crate::core::process::{Process, ProcessContext, Suspend};
use crate::core::types::{EntityId, PoolId, SimTime, StoreId};

#[derive(Debug, Clone, Copy, PartialEq)]
enum MachineState {
    /// Not yet started
    Idle,
    Operating,
    /// Broken and waiting on a spare since `failed_at`
    AwaitingSpare { failed_at: SimTime },
}

/// Lifecycle of one machine: run until failure, request a repair, wait
/// for a spare, go back to operating.
pub struct MachineProcess {
    entity: EntityId,
    index: usize,
    technicians: PoolId,
    spares: StoreId,
    state: MachineState,
    failures: u64,
}

impl MachineProcess {
    pub fn new(index: usize, technicians: PoolId, spares: StoreId) -> Self {
        Self {
            entity: EntityId::indexed("machine", index),
            index,
            technicians,
            spares,
            state: MachineState::Idle,
            failures: 0,
        }
    }

    fn start_operating(&mut self, ctx: &mut ProcessContext<'_, Workshop>) -> Suspend {
        let time_to_failure = ctx.state_mut().variates.sample_failure_interval();
        self.state = MachineState::Operating;
        Suspend::Timeout(time_to_failure)
    }
}

impl Process<Workshop> for MachineProcess {
    fn entity(&self) -> &EntityId {
        &self.entity
    }

    fn resume(&mut self, ctx: &mut ProcessContext<'_, Workshop>) -> Result<Suspend, SimError> {
        match self.state {
            MachineState::Idle => Ok(self.start_operating(ctx)),
            MachineState::Operating => {
                let failed_at = ctx.now();
                ctx.record(EventKind::MachineFailed, &self.entity);

                let repair = RepairProcess::new(
                    self.index,
                    self.failures,
                    self.technicians,
                    self.spares,
                );
                ctx.spawn(Box::new(repair))?;
                self.failures += 1;

                self.state = MachineState::AwaitingSpare { failed_at };
                Ok(Suspend::Get {
                    store: self.spares,
                    amount: 1,
                })
            }
            MachineState::AwaitingSpare { failed_at } => {
                let now = ctx.now();
                ctx.record(EventKind::MachineRestored, &self.entity);

                let workshop = ctx.state_mut();
                let penalty = workshop.rates.downtime_penalty_per_hour * (now - failed_at);
                workshop.costs.charge(now, CostCategory::Downtime, penalty)?;

                Ok(self.start_operating(ctx))
            }
        }
    }
}
