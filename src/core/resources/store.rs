use super::pool::Acquisition;
use crate::core::error::SimError;
use crate::core::types::{ProcessId, StoreId};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingGet {
    requester: ProcessId,
    amount: u64,
}

/// Countable stock with strict FIFO get/put.
///
/// A queued request is only served once everything ahead of it has been
/// served; a smaller later request never jumps an unsatisfied earlier one.
#[derive(Debug, Clone)]
pub struct InventoryStore {
    id: StoreId,
    name: String,
    capacity: u64,
    level: u64,
    wait_queue: VecDeque<PendingGet>,
    total_got: u64,
    total_put: u64,
}

impl InventoryStore {
    pub fn new(
        id: StoreId,
        name: impl Into<String>,
        capacity: u64,
        initial_level: u64,
    ) -> Result<Self, SimError> {
        let name = name.into();
        if capacity == 0 {
            return Err(SimError::InvalidResource(format!(
                "store '{}' must have a positive capacity",
                name
            )));
        }
        if initial_level > capacity {
            return Err(SimError::InvalidResource(format!(
                "store '{}' initial level {} exceeds capacity {}",
                name, initial_level, capacity
            )));
        }

        Ok(Self {
            id,
            name,
            capacity,
            level: initial_level,
            wait_queue: VecDeque::new(),
            total_got: 0,
            total_put: 0,
        })
    }

    /// Remove `amount` units for `requester`, or queue the request.
    ///
    /// Requests larger than the capacity could never be served and are
    /// rejected instead of queued. A zero-unit request takes nothing and is
    /// granted even behind waiters.
    pub fn get(&mut self, requester: ProcessId, amount: u64) -> Result<Acquisition, SimError> {
        if amount > self.capacity {
            return Err(SimError::UnsatisfiableGet {
                amount,
                capacity: self.capacity,
            });
        }
        if amount == 0 {
            return Ok(Acquisition::Granted);
        }

        if self.wait_queue.is_empty() && self.level >= amount {
            self.level -= amount;
            self.total_got += amount;
            Ok(Acquisition::Granted)
        } else {
            self.wait_queue.push_back(PendingGet { requester, amount });
            Ok(Acquisition::Queued)
        }
    }

    /// Add `amount` units and serve queued requests from the head while they
    /// fit. Returns the requesters that were served, in queue order.
    pub fn put(&mut self, amount: u64) -> Result<Vec<ProcessId>, SimError> {
        self.level = self
            .level
            .checked_add(amount)
            .filter(|level| *level <= self.capacity)
            .ok_or(SimError::StoreOverflow {
                amount,
                level: self.level,
                capacity: self.capacity,
            })?;
        self.total_put += amount;

        let mut served = Vec::new();
        while let Some(head) = self.wait_queue.front() {
            if head.amount > self.level {
                break;
            }
            self.level -= head.amount;
            self.total_got += head.amount;
            served.push(head.requester);
            self.wait_queue.pop_front();
        }

        Ok(served)
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    /// Processes currently waiting, head first
    pub fn waiters(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.wait_queue.iter().map(|pending| pending.requester)
    }

    /// Units handed out through granted gets
    pub fn total_got(&self) -> u64 {
        self.total_got
    }

    /// Units returned through puts
    pub fn total_put(&self) -> u64 {
        self.total_put
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: u64, level: u64) -> InventoryStore {
        InventoryStore::new(StoreId(0), "spares", capacity, level).unwrap()
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        assert!(InventoryStore::new(StoreId(0), "s", 0, 0).is_err());
        assert!(InventoryStore::new(StoreId(0), "s", 5, 6).is_err());
    }

    #[test]
    fn test_get_and_put_within_level() {
        let mut store = store(5, 3);
        assert_eq!(store.get(ProcessId(1), 2).unwrap(), Acquisition::Granted);
        assert_eq!(store.level(), 1);
        assert!(store.put(2).unwrap().is_empty());
        assert_eq!(store.level(), 3);
    }

    #[test]
    fn test_overflow_rejected_without_change() {
        let mut store = store(5, 4);
        assert_eq!(
            store.put(2),
            Err(SimError::StoreOverflow { amount: 2, level: 4, capacity: 5 })
        );
        assert_eq!(store.level(), 4);
    }

    #[test]
    fn test_huge_put_is_overflow_not_panic() {
        let mut store = store(5, 1);
        assert_eq!(
            store.put(u64::MAX),
            Err(SimError::StoreOverflow { amount: u64::MAX, level: 1, capacity: 5 })
        );
        assert_eq!(store.level(), 1);
        assert_eq!(store.total_put(), 0);
    }

    #[test]
    fn test_zero_get_granted_behind_waiter() {
        let mut store = store(5, 0);
        assert_eq!(store.get(ProcessId(1), 3).unwrap(), Acquisition::Queued);
        assert_eq!(store.get(ProcessId(2), 0).unwrap(), Acquisition::Granted);

        assert_eq!(store.queue_len(), 1);
        assert_eq!(store.level(), 0);
        assert_eq!(store.total_got(), 0);
    }

    #[test]
    fn test_get_above_capacity_is_error() {
        let mut store = store(3, 3);
        assert_eq!(
            store.get(ProcessId(1), 4),
            Err(SimError::UnsatisfiableGet { amount: 4, capacity: 3 })
        );
        assert_eq!(store.queue_len(), 0);
    }

    #[test]
    fn test_smaller_request_does_not_jump_queue() {
        let mut store = store(10, 0);
        assert_eq!(store.get(ProcessId(1), 3).unwrap(), Acquisition::Queued);
        assert_eq!(store.get(ProcessId(2), 1).unwrap(), Acquisition::Queued);

        // Enough for the second request but not the first
        assert!(store.put(2).unwrap().is_empty());
        assert_eq!(store.level(), 2);

        assert_eq!(store.put(2).unwrap(), vec![ProcessId(1), ProcessId(2)]);
        assert_eq!(store.level(), 0);
    }

    #[test]
    fn test_get_queues_behind_waiters_even_with_stock() {
        let mut store = store(10, 0);
        store.get(ProcessId(1), 5).unwrap();
        store.put(2).unwrap();

        assert_eq!(store.get(ProcessId(2), 1).unwrap(), Acquisition::Queued);
        assert_eq!(store.level(), 2);
    }
}
