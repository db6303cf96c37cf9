use super::error::SimError;
use super::types::{ProcessId, SimTime};
use log::debug;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A pending resumption of `process` at `due_time`
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    pub due_time: SimTime,
    pub sequence_num: u64,
    pub process: ProcessId,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.due_time == other.due_time && self.sequence_num == other.sequence_num
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .due_time
            .cmp(&self.due_time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Owns the virtual clock and the time-ordered pending-event queue.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
    now: SimTime,
}

impl EventScheduler {
    /// Create a new EventScheduler with the clock at zero
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            now: SimTime::ZERO,
        }
    }

    /// Current virtual time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Schedule `process` to resume `delay` time units from now.
    ///
    /// Negative and non-finite delays are rejected, never clamped.
    pub fn schedule(&mut self, process: ProcessId, delay: f64) -> Result<SimTime, SimError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(SimError::InvalidDelay { delay });
        }

        let due_time = self.now + delay;
        self.event_queue.push(ScheduledEvent {
            due_time,
            sequence_num: self.sequence_counter,
            process,
        });
        self.sequence_counter += 1;

        Ok(due_time)
    }

    /// Pop the earliest event if it is due strictly before `until`,
    /// advancing the clock to its due time.
    pub fn pop_before(&mut self, until: SimTime) -> Option<ScheduledEvent> {
        if self.peek_next_time()? >= until {
            return None;
        }

        let event = self.event_queue.pop()?;
        if event.due_time > self.now {
            debug!("clock {} -> {}", self.now, event.due_time);
            self.now = event.due_time;
        }
        Some(event)
    }

    /// Move the clock forward to `time` without firing anything
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.now {
            self.now = time;
        }
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.event_queue.len()
    }

    /// Get the next due time without removing events
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|event| event.due_time)
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_pop_in_time_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(ProcessId(1), 5.0).unwrap();
        scheduler.schedule(ProcessId(2), 1.0).unwrap();
        scheduler.schedule(ProcessId(3), 3.0).unwrap();

        let order: Vec<u64> = std::iter::from_fn(|| scheduler.pop_before(SimTime(100.0)))
            .map(|e| e.process.raw())
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(scheduler.now(), SimTime(5.0));
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        let mut scheduler = EventScheduler::new();
        for id in 0..5 {
            scheduler.schedule(ProcessId(id), 2.0).unwrap();
        }

        let order: Vec<u64> = std::iter::from_fn(|| scheduler.pop_before(SimTime(10.0)))
            .map(|e| e.process.raw())
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut scheduler = EventScheduler::new();
        assert_eq!(
            scheduler.schedule(ProcessId(0), -0.5),
            Err(SimError::InvalidDelay { delay: -0.5 })
        );
        assert!(scheduler.schedule(ProcessId(0), f64::NAN).is_err());
        assert!(scheduler.schedule(ProcessId(0), f64::INFINITY).is_err());
        assert!(!scheduler.has_events());
    }

    #[test]
    fn test_horizon_is_exclusive() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(ProcessId(0), 4.0).unwrap();
        scheduler.schedule(ProcessId(1), 8.0).unwrap();

        assert!(scheduler.pop_before(SimTime(8.0)).is_some());
        assert!(scheduler.pop_before(SimTime(8.0)).is_none());
        assert_eq!(scheduler.now(), SimTime(4.0));
        assert_eq!(scheduler.pending_len(), 1);
    }

    #[test]
    fn test_delay_is_relative_to_clock() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(ProcessId(0), 3.0).unwrap();
        scheduler.pop_before(SimTime(10.0)).unwrap();

        let due = scheduler.schedule(ProcessId(0), 2.0).unwrap();
        assert_eq!(due, SimTime(5.0));
    }
}
