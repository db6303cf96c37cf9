use super::error::SimError;
use super::event::{EventKind, EventRecord};
use super::event_scheduler::EventScheduler;
use super::resources::{InventoryStore, ResourcePool};
use super::types::{EntityId, PoolId, ProcessId, SimTime, StoreId};
use log::{debug, info};

/// The single suspension a process asks for when it yields control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// Resume after `delay` units of virtual time
    Timeout(f64),
    /// Resume once a slot of the pool is held
    Acquire(PoolId),
    /// Resume once `amount` units have been taken from the store
    Get { store: StoreId, amount: u64 },
    /// The behaviour loop is finished; drop the process
    Terminate,
}

/// A suspendable unit of simulated behaviour over shared state `S`.
///
/// `resume` runs the process from its last suspension point up to the next
/// one. Acquire and get requests that can be satisfied on the spot resume the
/// process again at the same instant without going through the event queue.
pub trait Process<S> {
    fn entity(&self) -> &EntityId;

    fn resume(&mut self, ctx: &mut ProcessContext<'_, S>) -> Result<Suspend, SimError>;
}

/// What a process can see and touch while it is running.
pub struct ProcessContext<'a, S> {
    pub(crate) pid: ProcessId,
    pub(crate) state: &'a mut S,
    pub(crate) scheduler: &'a mut EventScheduler,
    pub(crate) pools: &'a mut [ResourcePool],
    pub(crate) stores: &'a mut [InventoryStore],
    pub(crate) records: &'a mut Vec<EventRecord>,
    pub(crate) spawned: &'a mut Vec<(ProcessId, Box<dyn Process<S>>)>,
    pub(crate) next_process_id: &'a mut u64,
}

impl<'a, S> ProcessContext<'a, S> {
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Id of the running process
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn state(&self) -> &S {
        &*self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut *self.state
    }

    pub fn pool(&self, id: PoolId) -> Result<&ResourcePool, SimError> {
        self.pools.get(id.0).ok_or(SimError::UnknownPool(id))
    }

    pub fn store(&self, id: StoreId) -> Result<&InventoryStore, SimError> {
        self.stores.get(id.0).ok_or(SimError::UnknownStore(id))
    }

    /// Give back a pool slot held by the running process
    pub fn release(&mut self, id: PoolId) -> Result<(), SimError> {
        let pool = self.pools.get_mut(id.0).ok_or(SimError::UnknownPool(id))?;
        if let Some(next) = pool.release()? {
            debug!("[{}] slot handed to {}", pool.name(), next);
            self.scheduler.schedule(next, 0.0)?;
        }
        Ok(())
    }

    /// Put units into a store, waking every request it now satisfies
    pub fn put(&mut self, id: StoreId, amount: u64) -> Result<(), SimError> {
        let store = self.stores.get_mut(id.0).ok_or(SimError::UnknownStore(id))?;
        for served in store.put(amount)? {
            debug!("[{}] get served for {}", store.name(), served);
            self.scheduler.schedule(served, 0.0)?;
        }
        Ok(())
    }

    /// Start a new process at the current instant
    pub fn spawn(&mut self, process: Box<dyn Process<S>>) -> Result<ProcessId, SimError> {
        let pid = ProcessId(*self.next_process_id);
        *self.next_process_id += 1;
        self.scheduler.schedule(pid, 0.0)?;
        debug!("spawned {} as {}", process.entity(), pid);
        self.spawned.push((pid, process));
        Ok(pid)
    }

    /// Append a lifecycle record stamped with the current time
    pub fn record(&mut self, kind: EventKind, entity: &EntityId) {
        let record = EventRecord::new(self.now(), kind, entity.clone());
        info!("[{}] {} at t={}", record.entity, record.kind, record.time);
        self.records.push(record);
    }
}
