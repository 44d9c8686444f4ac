use super::direction::Direction;
use super::passenger::PassengerId;
use super::policy::{next_stop, DispatchPolicy, FloorScan};
use super::requests::HallCall;
use super::world::Building;
use crate::config::ElevatorTimings;
use crate::core::{Context, Process, SimError, Suspend};
use log::debug;
use std::collections::VecDeque;

/// Maximum number of passengers a car carries
pub const MAX_LOAD: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Open,
}

/// Physical state of one elevator car
#[derive(Debug, Clone)]
pub struct Car {
    index: usize,
    floor: usize,
    heading: Option<Direction>,
    door: DoorState,
    onboard: Vec<PassengerId>,
    capacity: usize,
    policy: DispatchPolicy,
    moves: u64,
}

impl Car {
    pub fn new(index: usize, floor: usize, policy: DispatchPolicy, capacity: usize) -> Self {
        Self {
            index,
            floor,
            heading: None,
            door: DoorState::Closed,
            onboard: Vec::new(),
            capacity,
            policy,
            moves: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn floor(&self) -> usize {
        self.floor
    }

    /// `None` while the car is idle
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    pub fn door(&self) -> DoorState {
        self.door
    }

    pub fn onboard(&self) -> &[PassengerId] {
        &self.onboard
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Number of floors travelled
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn is_full(&self) -> bool {
        self.onboard.len() >= self.capacity
    }

    pub(crate) fn set_heading(&mut self, heading: Option<Direction>) {
        self.heading = heading;
    }

    pub(crate) fn set_door(&mut self, door: DoorState) {
        self.door = door;
    }

    pub(crate) fn arrive_at(&mut self, floor: usize) {
        self.floor = floor;
        self.moves += 1;
    }

    pub(crate) fn add_rider(&mut self, passenger: PassengerId) -> Result<(), SimError> {
        if self.is_full() {
            return Err(SimError::InvalidOperation(format!(
                "car {} already carries {} passengers",
                self.index,
                self.onboard.len()
            )));
        }
        self.onboard.push(passenger);
        Ok(())
    }

    pub(crate) fn remove_rider(&mut self, passenger: PassengerId) {
        self.onboard.retain(|rider| *rider != passenger);
    }
}

/// Where the elevator process is within one floor visit
#[derive(Debug)]
enum Phase {
    /// Top of a visit: go to sleep if there is nothing to do
    Cycle,
    Unload,
    Disembark,
    StartScan,
    Scan {
        direction: Direction,
        first: Direction,
    },
    Board {
        direction: Direction,
        first: Direction,
        pending: Option<VecDeque<PassengerId>>,
    },
    EndDirection {
        direction: Direction,
        first: Direction,
        claimed: bool,
    },
    Close {
        scan: FloorScan,
    },
    Move {
        scan: FloorScan,
    },
    Arrive {
        floor: usize,
    },
}

/// Dispatch state machine driving one car.
///
/// Each visit to a floor: let riders out, claim and serve the floor's
/// requests (current heading first, then the opposite one), close the
/// doors, then ask the car's policy where to go next.
pub struct ElevatorProcess {
    car: usize,
    timings: ElevatorTimings,
    phase: Phase,
}

impl ElevatorProcess {
    pub fn new(car: usize, timings: ElevatorTimings) -> Self {
        Self {
            car,
            timings,
            phase: Phase::Cycle,
        }
    }
}

impl Process<Building> for ElevatorProcess {
    fn name(&self) -> String {
        format!("elevator#{}", self.car)
    }

    fn resume(&mut self, ctx: &mut Context<'_, Building>) -> Result<Suspend, SimError> {
        let now = ctx.now();
        loop {
            match std::mem::replace(&mut self.phase, Phase::Cycle) {
                Phase::Cycle => {
                    self.phase = Phase::Unload;
                    let car = ctx.world.car(self.car)?;
                    if car.heading().is_none() && ctx.world.requests().is_empty() {
                        debug!("t={} car {} idle at floor {}", now, self.car, car.floor());
                        return Ok(Suspend::Passivate);
                    }
                }
                Phase::Unload => {
                    if ctx.world.riders_for_floor(self.car)? > 0 {
                        ctx.world.car_mut(self.car)?.set_door(DoorState::Open);
                        self.phase = Phase::Disembark;
                        return Ok(Suspend::Delay(self.timings.t_open));
                    }
                    self.phase = Phase::StartScan;
                }
                Phase::Disembark => {
                    let floor = ctx.world.car(self.car)?.floor();
                    let leaving = ctx.world.disembark(self.car)?;
                    debug!(
                        "t={} car {} let out {} at floor {}",
                        now,
                        self.car,
                        leaving.len(),
                        floor
                    );
                    for process in leaving {
                        ctx.activate(process)?;
                    }
                    self.phase = Phase::StartScan;
                    return Ok(Suspend::Delay(self.timings.t_exit));
                }
                Phase::StartScan => {
                    let car = ctx.world.car_mut(self.car)?;
                    let first = car.heading().unwrap_or(Direction::Up);
                    car.set_heading(Some(first));
                    self.phase = Phase::Scan {
                        direction: first,
                        first,
                    };
                }
                Phase::Scan { direction, first } => {
                    let floor = ctx.world.car(self.car)?.floor();
                    let call = HallCall::new(floor, direction);
                    let claimed = ctx.world.requests_mut().claim(call);
                    match claimed {
                        Some(registered_at) => {
                            debug!(
                                "t={} car {} claimed {} request at floor {} (waiting since {})",
                                now, self.car, direction, floor, registered_at
                            );
                            self.phase = Phase::Board {
                                direction,
                                first,
                                pending: None,
                            };
                            let car = ctx.world.car_mut(self.car)?;
                            if car.door() == DoorState::Closed {
                                car.set_door(DoorState::Open);
                                return Ok(Suspend::Delay(self.timings.t_open));
                            }
                        }
                        None => {
                            self.phase = Phase::EndDirection {
                                direction,
                                first,
                                claimed: false,
                            };
                        }
                    }
                }
                Phase::Board {
                    direction,
                    first,
                    pending,
                } => {
                    let (floor, full) = {
                        let car = ctx.world.car(self.car)?;
                        (car.floor(), car.is_full())
                    };
                    let mut pending = match pending {
                        Some(pending) => pending,
                        None => ctx.world.floor(floor)?.waiting_for(direction),
                    };
                    self.phase = Phase::EndDirection {
                        direction,
                        first,
                        claimed: true,
                    };
                    if !full {
                        if let Some(passenger) = pending.pop_front() {
                            if ctx.world.board(self.car, passenger, now)? {
                                debug!("t={} car {} boarded {}", now, self.car, passenger);
                            } else {
                                debug!(
                                    "t={} car {} missed {}, already taken",
                                    now, self.car, passenger
                                );
                            }
                            self.phase = Phase::Board {
                                direction,
                                first,
                                pending: Some(pending),
                            };
                            return Ok(Suspend::Delay(self.timings.t_enter));
                        }
                    }
                }
                Phase::EndDirection {
                    direction,
                    first,
                    claimed,
                } => {
                    let floor = ctx.world.car(self.car)?.floor();
                    if claimed {
                        // Calls made while this car stood here belong to the same visit
                        let call = HallCall::new(floor, direction);
                        let made_during_visit = ctx.world.requests_mut().claim(call);
                        if ctx.world.floor(floor)?.count_for_direction(direction) > 0 {
                            // Residual queue starts over with a fresh timestamp
                            ctx.world.requests_mut().register(call, now);
                        } else if let Some(registered_at) = made_during_visit {
                            debug!(
                                "t={} car {} cleared {} request at floor {} made at {}",
                                now, self.car, direction, floor, registered_at
                            );
                        }
                    }

                    let car = ctx.world.car_mut(self.car)?;
                    car.set_heading(Some(direction));
                    self.phase = if !car.onboard().is_empty() {
                        Phase::Close {
                            scan: FloorScan {
                                first,
                                committed: Some(direction),
                            },
                        }
                    } else if direction == first {
                        Phase::Scan {
                            direction: first.opposite(),
                            first,
                        }
                    } else {
                        Phase::Close {
                            scan: FloorScan {
                                first,
                                committed: None,
                            },
                        }
                    };
                }
                Phase::Close { scan } => {
                    self.phase = Phase::Move { scan };
                    let car = ctx.world.car_mut(self.car)?;
                    if car.door() == DoorState::Open {
                        car.set_door(DoorState::Closed);
                        return Ok(Suspend::Delay(self.timings.t_close));
                    }
                }
                Phase::Move { scan } => {
                    let floors = ctx.world.floor_count();
                    let (floor, policy) = {
                        let car = ctx.world.car(self.car)?;
                        (car.floor(), car.policy())
                    };
                    let heading = policy.choose_heading(floor, scan, ctx.world.requests());
                    let stop = heading.and_then(|heading| next_stop(heading, floor, floors));

                    let car = ctx.world.car_mut(self.car)?;
                    match stop {
                        Some((heading, next)) => {
                            car.set_heading(Some(heading));
                            self.phase = Phase::Arrive { floor: next };
                            return Ok(Suspend::Delay(self.timings.t_move));
                        }
                        None => {
                            car.set_heading(None);
                            self.phase = Phase::Cycle;
                        }
                    }
                }
                Phase::Arrive { floor } => {
                    ctx.world.car_mut(self.car)?.arrive_at(floor);
                    self.phase = Phase::Cycle;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_capacity_is_enforced() {
        let mut car = Car::new(0, 0, DispatchPolicy::Standard, 2);
        car.add_rider(PassengerId(1)).unwrap();
        car.add_rider(PassengerId(2)).unwrap();
        assert!(car.is_full());
        assert!(matches!(
            car.add_rider(PassengerId(3)),
            Err(SimError::InvalidOperation(_))
        ));

        car.remove_rider(PassengerId(1));
        assert_eq!(car.onboard(), &[PassengerId(2)]);
        assert!(!car.is_full());
    }

    #[test]
    fn test_new_car_is_idle_and_closed() {
        let car = Car::new(1, 0, DispatchPolicy::Priority, MAX_LOAD);
        assert_eq!(car.heading(), None);
        assert_eq!(car.door(), DoorState::Closed);
        assert_eq!(car.capacity(), MAX_LOAD);
        assert_eq!(car.moves(), 0);
    }
}
