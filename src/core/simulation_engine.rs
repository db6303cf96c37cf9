use super::error::SimError;
use super::event::EventRecord;
use super::event_scheduler::EventScheduler;
use super::process::{Process, ProcessContext, Suspend};
use super::resources::{Acquisition, InventoryStore, ResourcePool};
use super::types::{PoolId, ProcessId, SimTime, StoreId};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the virtual clock moves forward
    fn on_clock_advance(&mut self, _old_time: SimTime, _new_time: SimTime) {}

    /// Called after each fired event has been fully handled
    fn on_step_complete(
        &mut self,
        now: SimTime,
        pools: &[ResourcePool],
        stores: &[InventoryStore],
    );

    /// Called for every lifecycle record, in emission order
    fn on_record(&mut self, _record: &EventRecord) {}
}

/// How a call to [`SimulationEngine::run`] ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Events remain pending at or beyond the horizon
    HorizonReached,
    /// The pending queue drained before the horizon; `blocked` lists the
    /// processes still waiting on a pool or store, which nothing can wake
    Exhausted { blocked: Vec<ProcessId> },
}

/// Single-threaded cooperative scheduler over processes sharing state `S`.
pub struct SimulationEngine<S> {
    scheduler: EventScheduler,
    processes: HashMap<ProcessId, Box<dyn Process<S>>>,
    pools: Vec<ResourcePool>,
    stores: Vec<InventoryStore>,
    state: S,
    records: Vec<EventRecord>,
    observers: Vec<Box<dyn SimulationObserver>>,
    next_process_id: u64,
    events_processed: u64,
}

impl<S> SimulationEngine<S> {
    /// Create a new engine at time zero around the shared state
    pub fn new(state: S) -> Self {
        Self {
            scheduler: EventScheduler::new(),
            processes: HashMap::new(),
            pools: Vec::new(),
            stores: Vec::new(),
            state,
            records: Vec::new(),
            observers: Vec::new(),
            next_process_id: 0,
            events_processed: 0,
        }
    }

    /// Register a capacity-limited resource pool
    pub fn add_pool(&mut self, name: &str, capacity: u64) -> Result<PoolId, SimError> {
        let id = PoolId(self.pools.len());
        self.pools.push(ResourcePool::new(id, name, capacity)?);
        Ok(id)
    }

    /// Register an inventory store
    pub fn add_store(
        &mut self,
        name: &str,
        capacity: u64,
        initial_level: u64,
    ) -> Result<StoreId, SimError> {
        let id = StoreId(self.stores.len());
        self.stores
            .push(InventoryStore::new(id, name, capacity, initial_level)?);
        Ok(id)
    }

    /// Register a process and schedule its first resumption at the current time
    pub fn spawn(&mut self, process: Box<dyn Process<S>>) -> Result<ProcessId, SimError> {
        let pid = ProcessId(self.next_process_id);
        self.scheduler.schedule(pid, 0.0)?;
        self.next_process_id += 1;
        self.processes.insert(pid, process);
        Ok(pid)
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Run until the clock would reach `until`, then halt.
    ///
    /// Events due strictly before `until` are fired; the clock is left at
    /// `until` afterwards.
    pub fn run(&mut self, until: SimTime) -> Result<RunOutcome, SimError> {
        let now = self.now();
        if !until.as_f64().is_finite() || until < now {
            return Err(SimError::InvalidHorizon { until, now });
        }

        while self.step(until)? {}

        let outcome = if self.scheduler.has_events() {
            RunOutcome::HorizonReached
        } else {
            let blocked = self.blocked_processes();
            if !blocked.is_empty() {
                warn!(
                    "event queue drained at t={} with {} process(es) blocked forever",
                    self.now(),
                    blocked.len()
                );
            }
            RunOutcome::Exhausted { blocked }
        };

        let old_time = self.now();
        self.scheduler.advance_to(until);
        if self.now() > old_time {
            self.notify_clock_advance(old_time, self.now());
        }

        Ok(outcome)
    }

    /// Fire the next event due before `until`. Returns false when there is
    /// nothing left to fire.
    pub fn step(&mut self, until: SimTime) -> Result<bool, SimError> {
        let old_time = self.now();
        let Some(event) = self.scheduler.pop_before(until) else {
            return Ok(false);
        };

        if event.due_time > old_time {
            self.notify_clock_advance(old_time, event.due_time);
        }

        self.resume(event.process)?;
        self.events_processed += 1;

        let now = self.now();
        for observer in &mut self.observers {
            observer.on_step_complete(now, &self.pools, &self.stores);
        }

        Ok(true)
    }

    /// Drive one process until it parks on a timeout or a wait queue, or ends
    fn resume(&mut self, pid: ProcessId) -> Result<(), SimError> {
        let mut process = self
            .processes
            .remove(&pid)
            .ok_or(SimError::UnknownProcess(pid))?;

        loop {
            let first_new_record = self.records.len();
            let mut spawned = Vec::new();

            let request = {
                let mut ctx = ProcessContext {
                    pid,
                    state: &mut self.state,
                    scheduler: &mut self.scheduler,
                    pools: &mut self.pools,
                    stores: &mut self.stores,
                    records: &mut self.records,
                    spawned: &mut spawned,
                    next_process_id: &mut self.next_process_id,
                };
                process.resume(&mut ctx)
            };

            self.processes.extend(spawned);
            for record in &self.records[first_new_record..] {
                for observer in &mut self.observers {
                    observer.on_record(record);
                }
            }

            match request? {
                Suspend::Timeout(delay) => {
                    let due = self.scheduler.schedule(pid, delay)?;
                    debug!("{} ({}) sleeps until {}", process.entity(), pid, due);
                    break;
                }
                Suspend::Acquire(pool_id) => {
                    let pool = self
                        .pools
                        .get_mut(pool_id.0)
                        .ok_or(SimError::UnknownPool(pool_id))?;
                    match pool.acquire(pid) {
                        Acquisition::Granted => continue,
                        Acquisition::Queued => {
                            debug!(
                                "{} ({}) waits on {} ({} queued)",
                                process.entity(),
                                pid,
                                pool.name(),
                                pool.queue_len()
                            );
                            break;
                        }
                    }
                }
                Suspend::Get { store, amount } => {
                    let inventory = self
                        .stores
                        .get_mut(store.0)
                        .ok_or(SimError::UnknownStore(store))?;
                    match inventory.get(pid, amount)? {
                        Acquisition::Granted => continue,
                        Acquisition::Queued => {
                            debug!(
                                "{} ({}) waits for {} from {} (level {})",
                                process.entity(),
                                pid,
                                amount,
                                inventory.name(),
                                inventory.level()
                            );
                            break;
                        }
                    }
                }
                Suspend::Terminate => {
                    debug!("{} ({}) terminated", process.entity(), pid);
                    return Ok(());
                }
            }
        }

        self.processes.insert(pid, process);
        Ok(())
    }

    fn notify_clock_advance(&mut self, old_time: SimTime, new_time: SimTime) {
        for observer in &mut self.observers {
            observer.on_clock_advance(old_time, new_time);
        }
    }

    /// Processes parked in any pool or store queue, pools first
    pub fn blocked_processes(&self) -> Vec<ProcessId> {
        let from_pools = self.pools.iter().flat_map(|pool| pool.waiters());
        let from_stores = self.stores.iter().flat_map(|store| store.waiters());
        from_pools.chain(from_stores).collect()
    }

    /// Get current simulation time
    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Number of live (not yet terminated) processes
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn pool(&self, id: PoolId) -> Result<&ResourcePool, SimError> {
        self.pools.get(id.0).ok_or(SimError::UnknownPool(id))
    }

    pub fn store(&self, id: StoreId) -> Result<&InventoryStore, SimError> {
        self.stores.get(id.0).ok_or(SimError::UnknownStore(id))
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Lifecycle records emitted so far, in emission order
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Consume the engine, keeping the shared state and the record log
    pub fn into_parts(self) -> (S, Vec<EventRecord>) {
        (self.state, self.records)
    }
}
