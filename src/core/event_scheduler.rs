use super::event::WakeEvent;
use super::types::{ProcessId, SimTime};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
struct ScheduledEvent(WakeEvent);

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.0.time == other.0.time && self.0.sequence_num == other.0.sequence_num
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
            .0
            .time
            .cmp(&self.0.time)
            .then_with(|| other.0.sequence_num.cmp(&self.0.sequence_num))
    }
}

/// Time-ordered queue of process wake-ups.
///
/// Wake-ups sharing the same time are returned in the order they were
/// scheduled, which keeps a run fully deterministic.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule `process` to wake at absolute time `time`, returning the sequence number
    pub fn schedule(&mut self, process: ProcessId, time: SimTime) -> u64 {
        let sequence_num = self.sequence_counter;
        self.event_queue
            .push(ScheduledEvent(WakeEvent::new(time, sequence_num, process)));
        self.sequence_counter += 1;
        sequence_num
    }

    /// Remove and return the earliest wake-up
    pub fn pop_next(&mut self) -> Option<WakeEvent> {
        self.event_queue.pop().map(|scheduled| scheduled.0)
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Get the time of the next wake-up without removing it
    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|scheduled| scheduled.0.time)
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
