use super::direction::Direction;
use super::world::Building;
use crate::core::{Context, Process, ProcessId, SimError, SimTime, Suspend};
use log::debug;

/// Unique passenger identifier, handed out in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassengerId(pub(crate) u64);

impl PassengerId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PassengerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "passenger#{}", self.0)
    }
}

/// Where a passenger currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Created but its process has not run yet
    Arriving,
    Waiting { floor: usize },
    Riding { car: usize },
    /// Dropped at the destination, waiting for its process to finish
    Delivered,
}

/// A single traveller
#[derive(Debug, Clone)]
pub struct Passenger {
    id: PassengerId,
    process: ProcessId,
    origin: usize,
    destination: usize,
    direction: Direction,
    location: Location,
    arrived_at: Option<SimTime>,
}

impl Passenger {
    /// Create a passenger; origin and destination must differ
    pub fn new(
        id: PassengerId,
        process: ProcessId,
        origin: usize,
        destination: usize,
    ) -> Result<Self, SimError> {
        let direction = Direction::between(origin, destination).ok_or_else(|| {
            SimError::InvalidOperation(format!(
                "{} would travel from floor {} to itself",
                id, origin
            ))
        })?;
        Ok(Self {
            id,
            process,
            origin,
            destination,
            direction,
            location: Location::Arriving,
            arrived_at: None,
        })
    }

    pub fn id(&self) -> PassengerId {
        self.id
    }

    pub fn process(&self) -> ProcessId {
        self.process
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    /// Time the passenger entered its origin floor's queue
    pub fn arrived_at(&self) -> Option<SimTime> {
        self.arrived_at
    }

    pub(crate) fn set_arrived_at(&mut self, now: SimTime) {
        self.arrived_at = Some(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Arrive,
    Travelling,
}

/// Process body of a passenger: queue up, call the lifts, sleep until delivered
pub struct PassengerProcess {
    passenger: PassengerId,
    stage: Stage,
}

impl PassengerProcess {
    pub fn new(passenger: PassengerId) -> Self {
        Self {
            passenger,
            stage: Stage::Arrive,
        }
    }
}

impl Process<Building> for PassengerProcess {
    fn name(&self) -> String {
        self.passenger.to_string()
    }

    fn resume(&mut self, ctx: &mut Context<'_, Building>) -> Result<Suspend, SimError> {
        let now = ctx.now();
        match self.stage {
            Stage::Arrive => {
                let registered = ctx.world.arrive(self.passenger, now)?;
                debug!(
                    "t={} {} waiting (new request: {})",
                    now, self.passenger, registered
                );

                let elevators = ctx.world.elevator_processes().to_vec();
                for elevator in elevators {
                    if ctx.is_passive(elevator) {
                        ctx.activate(elevator)?;
                    }
                }

                self.stage = Stage::Travelling;
                Ok(Suspend::Passivate)
            }
            Stage::Travelling => {
                ctx.world.complete(self.passenger, now)?;
                debug!("t={} {} reached its destination", now, self.passenger);
                Ok(Suspend::Finish)
            }
        }
    }
}
