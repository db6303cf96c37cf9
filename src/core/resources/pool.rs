use crate::core::error::SimError;
use crate::core::types::{PoolId, ProcessId};
use std::collections::VecDeque;

/// Result of a request against a shared resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// The request was satisfied without suspending the caller
    Granted,
    /// The caller was appended to the wait queue
    Queued,
}

/// Capacity-limited service with FIFO-fair acquire/release.
///
/// A released slot is handed straight to the head of the wait queue, so a
/// queued requester can never be overtaken by a later one.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    id: PoolId,
    name: String,
    capacity: u64,
    in_use: u64,
    wait_queue: VecDeque<ProcessId>,
    total_grants: u64,
}

impl ResourcePool {
    pub fn new(id: PoolId, name: impl Into<String>, capacity: u64) -> Result<Self, SimError> {
        let name = name.into();
        if capacity == 0 {
            return Err(SimError::InvalidResource(format!(
                "pool '{}' must have a positive capacity",
                name
            )));
        }

        Ok(Self {
            id,
            name,
            capacity,
            in_use: 0,
            wait_queue: VecDeque::new(),
            total_grants: 0,
        })
    }

    /// Take a slot for `requester`, or queue it behind earlier waiters
    pub fn acquire(&mut self, requester: ProcessId) -> Acquisition {
        if self.in_use < self.capacity && self.wait_queue.is_empty() {
            self.in_use += 1;
            self.total_grants += 1;
            Acquisition::Granted
        } else {
            self.wait_queue.push_back(requester);
            Acquisition::Queued
        }
    }

    /// Free a slot. If anyone is waiting, the slot passes to the head of the
    /// queue and that process is returned so the caller can resume it.
    pub fn release(&mut self) -> Result<Option<ProcessId>, SimError> {
        if self.in_use == 0 {
            return Err(SimError::ReleaseWithoutAcquire(self.id));
        }
        self.in_use -= 1;

        match self.wait_queue.pop_front() {
            Some(next) => {
                self.in_use += 1;
                self.total_grants += 1;
                Ok(Some(next))
            }
            None => Ok(None),
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn in_use(&self) -> u64 {
        self.in_use
    }

    pub fn available(&self) -> u64 {
        self.capacity - self.in_use
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    /// Processes currently waiting, head first
    pub fn waiters(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.wait_queue.iter().copied()
    }

    pub fn total_grants(&self) -> u64 {
        self.total_grants
    }
}
