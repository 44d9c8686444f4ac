use super::elevator::Car;
use super::floor::Floor;
use super::passenger::{Location, Passenger, PassengerId};
use super::policy::DispatchPolicy;
use super::requests::{HallCall, RequestTable};
use crate::core::{ProcessId, SimError, SimTime, Tally};
use log::warn;
use std::collections::HashMap;

/// Shared state of the simulated building.
///
/// Every process reads and mutates it through its `Context`; the
/// cooperative engine guarantees no two processes touch it at once.
pub struct Building {
    floors: Vec<Floor>,
    requests: RequestTable,
    passengers: HashMap<PassengerId, Passenger>,
    cars: Vec<Car>,
    elevator_processes: Vec<ProcessId>,
    journeys: Tally,
    next_passenger: u64,
    delivered: u64,
}

impl Building {
    /// Create a building of `floor_count` levels with `car_count` cars parked at floor 0
    pub fn new(
        floor_count: usize,
        car_count: usize,
        policy: DispatchPolicy,
        capacity: usize,
    ) -> Self {
        Self {
            floors: (0..floor_count).map(Floor::new).collect(),
            requests: RequestTable::new(),
            passengers: HashMap::new(),
            cars: (0..car_count)
                .map(|index| Car::new(index, 0, policy, capacity))
                .collect(),
            elevator_processes: Vec::new(),
            journeys: Tally::new(),
            next_passenger: 0,
            delivered: 0,
        }
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn floor(&self, level: usize) -> Result<&Floor, SimError> {
        self.floors
            .get(level)
            .ok_or_else(|| SimError::NotFound(format!("floor {}", level)))
    }

    fn floor_mut(&mut self, level: usize) -> Result<&mut Floor, SimError> {
        self.floors
            .get_mut(level)
            .ok_or_else(|| SimError::NotFound(format!("floor {}", level)))
    }

    pub fn requests(&self) -> &RequestTable {
        &self.requests
    }

    pub fn requests_mut(&mut self) -> &mut RequestTable {
        &mut self.requests
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn car(&self, index: usize) -> Result<&Car, SimError> {
        self.cars
            .get(index)
            .ok_or_else(|| SimError::NotFound(format!("car {}", index)))
    }

    pub fn car_mut(&mut self, index: usize) -> Result<&mut Car, SimError> {
        self.cars
            .get_mut(index)
            .ok_or_else(|| SimError::NotFound(format!("car {}", index)))
    }

    /// Remember the process driving a car, so passengers can wake it
    pub fn register_elevator(&mut self, process: ProcessId) {
        self.elevator_processes.push(process);
    }

    pub fn elevator_processes(&self) -> &[ProcessId] {
        &self.elevator_processes
    }

    pub fn next_passenger_id(&mut self) -> PassengerId {
        let id = PassengerId(self.next_passenger);
        self.next_passenger += 1;
        id
    }

    /// Add a freshly created passenger to the registry
    pub fn admit(&mut self, passenger: Passenger) -> Result<(), SimError> {
        for level in [passenger.origin(), passenger.destination()] {
            if level >= self.floors.len() {
                return Err(SimError::InvalidOperation(format!(
                    "{} refers to floor {} in a {}-floor building",
                    passenger.id(),
                    level,
                    self.floors.len()
                )));
            }
        }
        self.passengers.insert(passenger.id(), passenger);
        Ok(())
    }

    pub fn passenger(&self, id: PassengerId) -> Result<&Passenger, SimError> {
        self.passengers
            .get(&id)
            .ok_or_else(|| SimError::NotFound(id.to_string()))
    }

    fn passenger_mut(&mut self, id: PassengerId) -> Result<&mut Passenger, SimError> {
        self.passengers
            .get_mut(&id)
            .ok_or_else(|| SimError::NotFound(id.to_string()))
    }

    /// Passengers still in the building, in no particular order
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.values()
    }

    /// Put a passenger in its origin queue and register its pickup request.
    ///
    /// Returns true if this created a new request table entry.
    pub fn arrive(&mut self, id: PassengerId, now: SimTime) -> Result<bool, SimError> {
        let passenger = self.passenger_mut(id)?;
        if passenger.location() != Location::Arriving {
            return Err(SimError::InvalidOperation(format!(
                "{} arrived twice",
                id
            )));
        }
        let (origin, direction) = (passenger.origin(), passenger.direction());
        passenger.set_location(Location::Waiting { floor: origin });
        passenger.set_arrived_at(now);

        self.floor_mut(origin)?.enter(id, direction, now);
        Ok(self.requests.register(HallCall::new(origin, direction), now))
    }

    /// Number of riders in a car whose destination is the car's floor
    pub fn riders_for_floor(&self, car: usize) -> Result<usize, SimError> {
        let car = self.car(car)?;
        let mut count = 0;
        for id in car.onboard() {
            if self.passenger(*id)?.destination() == car.floor() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Let out every rider whose destination is the car's floor.
    ///
    /// Returns the processes of the passengers that got out, in boarding order.
    pub fn disembark(&mut self, car: usize) -> Result<Vec<ProcessId>, SimError> {
        let floor = self.car(car)?.floor();
        let mut leaving = Vec::new();
        for id in self.car(car)?.onboard().to_vec() {
            let passenger = self.passenger_mut(id)?;
            if passenger.destination() == floor {
                passenger.set_location(Location::Delivered);
                leaving.push((id, passenger.process()));
            }
        }

        let car = self.car_mut(car)?;
        for (id, _) in &leaving {
            car.remove_rider(*id);
        }
        Ok(leaving.into_iter().map(|(_, process)| process).collect())
    }

    /// Move a waiting passenger from the car's floor into the car.
    ///
    /// Returns false if the passenger is no longer waiting on that floor,
    /// for instance because another car took it first.
    pub fn board(&mut self, car: usize, id: PassengerId, now: SimTime) -> Result<bool, SimError> {
        let (floor, full) = {
            let car = self.car(car)?;
            (car.floor(), car.is_full())
        };
        if self.passenger(id)?.location() != (Location::Waiting { floor }) {
            return Ok(false);
        }
        if full {
            return Err(SimError::InvalidOperation(format!(
                "car {} is full, cannot board {}",
                car, id
            )));
        }

        if self.floor_mut(floor)?.leave(id, now).is_none() {
            return Err(SimError::InvalidOperation(format!(
                "{} is marked waiting on floor {} but not queued there",
                id, floor
            )));
        }
        self.car_mut(car)?.add_rider(id)?;
        self.passenger_mut(id)?.set_location(Location::Riding { car });
        Ok(true)
    }

    /// Retire a delivered passenger and record its journey time
    pub fn complete(&mut self, id: PassengerId, now: SimTime) -> Result<(), SimError> {
        let passenger = self.passenger(id)?;
        if passenger.location() != Location::Delivered {
            return Err(SimError::InvalidOperation(format!(
                "{} woken before delivery ({:?})",
                id,
                passenger.location()
            )));
        }
        if let Some(arrived_at) = passenger.arrived_at() {
            self.journeys.record(now.saturating_sub(arrived_at) as f64);
        }
        self.passengers.remove(&id);
        self.delivered += 1;
        Ok(())
    }

    /// Number of passengers queued on any floor
    pub fn waiting_count(&self) -> usize {
        self.floors.iter().map(Floor::len).sum()
    }

    /// Arrival-to-delivery times of completed passengers in the current window
    pub fn journeys(&self) -> &Tally {
        &self.journeys
    }

    /// Passengers delivered since the building was created
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Passengers created since the building was created
    pub fn created(&self) -> u64 {
        self.next_passenger
    }

    /// Discard all statistics gathered so far and start measuring at `now`
    pub fn reset_statistics(&mut self, now: SimTime) {
        for floor in &mut self.floors {
            floor.reset_monitors(now);
        }
        self.journeys.reset();
        if self.requests.is_empty() && self.waiting_count() > 0 {
            warn!(
                "t={} {} passengers waiting with no pending request",
                now,
                self.waiting_count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::direction::Direction;

    fn building_with_passenger(origin: usize, destination: usize) -> (Building, PassengerId) {
        let mut building = Building::new(5, 2, DispatchPolicy::Standard, 2);
        let id = building.next_passenger_id();
        building
            .admit(Passenger::new(id, ProcessId(10), origin, destination).unwrap())
            .unwrap();
        (building, id)
    }

    #[test]
    fn test_arrive_queues_and_registers_once() {
        let (mut building, first) = building_with_passenger(0, 3);
        assert!(building.arrive(first, 5).unwrap());

        let second = building.next_passenger_id();
        building
            .admit(Passenger::new(second, ProcessId(11), 0, 4).unwrap())
            .unwrap();
        assert!(!building.arrive(second, 9).unwrap());

        assert_eq!(building.floor(0).unwrap().len(), 2);
        assert_eq!(
            building.requests().time_of(HallCall::new(0, Direction::Up)),
            Some(5)
        );
        assert!(building.arrive(first, 10).is_err());
    }

    #[test]
    fn test_admit_rejects_floor_outside_building() {
        let mut building = Building::new(3, 1, DispatchPolicy::Standard, 8);
        let id = building.next_passenger_id();
        let passenger = Passenger::new(id, ProcessId(0), 0, 7).unwrap();
        assert!(building.admit(passenger).is_err());
    }

    #[test]
    fn test_board_ride_and_deliver() {
        let (mut building, id) = building_with_passenger(0, 3);
        building.arrive(id, 0).unwrap();

        assert!(building.board(0, id, 4).unwrap());
        assert_eq!(building.passenger(id).unwrap().location(), Location::Riding { car: 0 });
        assert_eq!(building.floor(0).unwrap().length_of_stay().mean(), 4.0);

        // A second car cannot take the same passenger
        assert!(!building.board(1, id, 4).unwrap());

        assert_eq!(building.riders_for_floor(0).unwrap(), 0);
        building.car_mut(0).unwrap().arrive_at(3);
        assert_eq!(building.riders_for_floor(0).unwrap(), 1);

        let leaving = building.disembark(0).unwrap();
        assert_eq!(leaving, vec![ProcessId(10)]);
        assert!(building.car(0).unwrap().onboard().is_empty());

        building.complete(id, 40).unwrap();
        assert_eq!(building.journeys().count(), 1);
        assert_eq!(building.journeys().mean(), 40.0);
        assert_eq!(building.delivered(), 1);
        assert!(building.passenger(id).is_err());
    }

    #[test]
    fn test_complete_before_delivery_fails() {
        let (mut building, id) = building_with_passenger(1, 2);
        building.arrive(id, 0).unwrap();
        assert!(matches!(
            building.complete(id, 5),
            Err(SimError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_board_full_car_fails() {
        let mut building = Building::new(3, 1, DispatchPolicy::Standard, 1);
        let mut ids = Vec::new();
        for process in 0..2 {
            let id = building.next_passenger_id();
            building
                .admit(Passenger::new(id, ProcessId(process), 0, 2).unwrap())
                .unwrap();
            building.arrive(id, 0).unwrap();
            ids.push(id);
        }

        assert!(building.board(0, ids[0], 1).unwrap());
        assert!(building.board(0, ids[1], 1).is_err());
        assert_eq!(building.floor(0).unwrap().len(), 1);
    }

    #[test]
    fn test_reset_statistics_clears_samples() {
        let (mut building, id) = building_with_passenger(2, 0);
        building.arrive(id, 0).unwrap();
        building.car_mut(0).unwrap().arrive_at(2);
        building.board(0, id, 6).unwrap();

        building.reset_statistics(10);
        assert_eq!(building.floor(2).unwrap().length_of_stay().count(), 0);
        assert_eq!(building.created(), 1);
    }
}
