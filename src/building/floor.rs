use super::direction::Direction;
use super::passenger::PassengerId;
use crate::core::{LevelMonitor, SimTime, Tally};
use std::collections::VecDeque;

/// A passenger standing in a floor's wait queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub passenger: PassengerId,
    pub direction: Direction,
    pub entered_at: SimTime,
}

/// One level of the building and the passengers waiting on it
#[derive(Debug, Clone)]
pub struct Floor {
    level: usize,
    occupants: VecDeque<Occupant>,
    length_of_stay: Tally,
    length: LevelMonitor,
}

impl Floor {
    pub fn new(level: usize) -> Self {
        Self {
            level,
            occupants: VecDeque::new(),
            length_of_stay: Tally::new(),
            length: LevelMonitor::new(0, 0),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Append a passenger to the wait queue
    pub fn enter(&mut self, passenger: PassengerId, direction: Direction, now: SimTime) {
        self.occupants.push_back(Occupant {
            passenger,
            direction,
            entered_at: now,
        });
        self.length.set(self.occupants.len(), now);
    }

    /// Take a passenger out of the wait queue and record its length of stay.
    ///
    /// Returns the stay, or `None` if the passenger is not waiting here.
    pub fn leave(&mut self, passenger: PassengerId, now: SimTime) -> Option<SimTime> {
        let position = self
            .occupants
            .iter()
            .position(|occupant| occupant.passenger == passenger)?;
        let occupant = self.occupants.remove(position)?;
        let stay = now.saturating_sub(occupant.entered_at);
        self.length_of_stay.record(stay as f64);
        self.length.set(self.occupants.len(), now);
        Some(stay)
    }

    pub fn contains(&self, passenger: PassengerId) -> bool {
        self.occupants
            .iter()
            .any(|occupant| occupant.passenger == passenger)
    }

    /// Number of waiting passengers travelling in `direction`
    pub fn count_for_direction(&self, direction: Direction) -> usize {
        self.occupants
            .iter()
            .filter(|occupant| occupant.direction == direction)
            .count()
    }

    /// Waiting passengers travelling in `direction`, in arrival order
    pub fn waiting_for(&self, direction: Direction) -> VecDeque<PassengerId> {
        self.occupants
            .iter()
            .filter(|occupant| occupant.direction == direction)
            .map(|occupant| occupant.passenger)
            .collect()
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.occupants.iter()
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn length_of_stay(&self) -> &Tally {
        &self.length_of_stay
    }

    pub fn mean_queue_length(&self, now: SimTime) -> f64 {
        self.length.mean(now)
    }

    /// Start a fresh measuring window at `now`; waiting passengers stay queued
    pub fn reset_monitors(&mut self, now: SimTime) {
        self.length_of_stay.reset();
        self.length.reset(now);
    }
}
