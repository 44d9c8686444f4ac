use super::direction::Direction;
use crate::core::SimTime;
use std::collections::BTreeMap;

/// A pending pickup request: somebody at `floor` wants to travel in `direction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HallCall {
    pub floor: usize,
    pub direction: Direction,
}

impl HallCall {
    pub fn new(floor: usize, direction: Direction) -> Self {
        Self { floor, direction }
    }
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    time: SimTime,
    sequence_num: u64,
}

/// Building-wide table of outstanding pickup requests.
///
/// Holds at most one entry per (floor, direction) with the time of the
/// earliest unclaimed registration. Elevators claim an entry by removing it.
#[derive(Debug, Default)]
pub struct RequestTable {
    entries: BTreeMap<HallCall, Registration>,
    sequence_counter: u64,
    claims: u64,
}

impl RequestTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request; an existing entry keeps its earlier time. Returns true if inserted.
    pub fn register(&mut self, call: HallCall, now: SimTime) -> bool {
        if self.entries.contains_key(&call) {
            return false;
        }
        self.entries.insert(
            call,
            Registration {
                time: now,
                sequence_num: self.sequence_counter,
            },
        );
        self.sequence_counter += 1;
        true
    }

    /// Remove the entry for `call`, returning its registration time if there was one
    pub fn claim(&mut self, call: HallCall) -> Option<SimTime> {
        let registration = self.entries.remove(&call)?;
        self.claims += 1;
        Some(registration.time)
    }

    pub fn contains(&self, call: HallCall) -> bool {
        self.entries.contains_key(&call)
    }

    pub fn time_of(&self, call: HallCall) -> Option<SimTime> {
        self.entries.get(&call).map(|registration| registration.time)
    }

    /// The oldest request; ties go to the entry registered first
    pub fn earliest(&self) -> Option<(HallCall, SimTime)> {
        self.entries
            .iter()
            .min_by_key(|(_, registration)| (registration.time, registration.sequence_num))
            .map(|(call, registration)| (*call, registration.time))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of successful claims since the table was created
    pub fn claims(&self) -> u64 {
        self.claims
    }

    pub fn iter(&self) -> impl Iterator<Item = (HallCall, SimTime)> + '_ {
        self.entries
            .iter()
            .map(|(call, registration)| (*call, registration.time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_keeps_earliest_time() {
        let mut table = RequestTable::new();
        let call = HallCall::new(3, Direction::Up);

        assert!(table.register(call, 10));
        assert!(!table.register(call, 25));
        assert_eq!(table.time_of(call), Some(10));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_claim_removes_entry_once() {
        let mut table = RequestTable::new();
        let call = HallCall::new(1, Direction::Down);
        table.register(call, 4);

        assert_eq!(table.claim(call), Some(4));
        assert_eq!(table.claim(call), None);
        assert!(table.is_empty());
        assert_eq!(table.claims(), 1);
    }

    #[test]
    fn test_reinsert_after_claim_uses_new_time() {
        let mut table = RequestTable::new();
        let call = HallCall::new(2, Direction::Up);
        table.register(call, 4);
        table.claim(call);
        table.register(call, 40);
        assert_eq!(table.time_of(call), Some(40));
    }

    #[test]
    fn test_same_floor_different_directions_are_distinct() {
        let mut table = RequestTable::new();
        assert!(table.register(HallCall::new(2, Direction::Up), 1));
        assert!(table.register(HallCall::new(2, Direction::Down), 2));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_earliest_breaks_ties_by_registration_order() {
        let mut table = RequestTable::new();
        table.register(HallCall::new(7, Direction::Down), 50);
        table.register(HallCall::new(5, Direction::Up), 20);
        table.register(HallCall::new(1, Direction::Up), 20);

        assert_eq!(
            table.earliest(),
            Some((HallCall::new(5, Direction::Up), 20))
        );

        table.claim(HallCall::new(5, Direction::Up));
        assert_eq!(
            table.earliest(),
            Some((HallCall::new(1, Direction::Up), 20))
        );
    }

    #[test]
    fn test_earliest_of_empty_table() {
        assert_eq!(RequestTable::new().earliest(), None);
    }
}
