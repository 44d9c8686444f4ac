use super::passenger::{Passenger, PassengerProcess};
use super::world::Building;
use crate::core::{Context, Process, SimError, SimTime, Suspend};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates one passenger per interval with a random origin and destination
pub struct ArrivalGenerator {
    rng: StdRng,
    floors: usize,
    interval: SimTime,
}

impl ArrivalGenerator {
    /// Create a generator for a building of `floors` levels (at least two)
    pub fn new(floors: usize, interval: SimTime, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            floors,
            interval,
        }
    }

    /// Draw an origin uniformly, then a destination uniformly among the other floors
    pub fn pick_trip(&mut self) -> (usize, usize) {
        let origin = self.rng.gen_range(0..self.floors);
        let destination = self.rng.gen_range(0..self.floors - 1);
        if destination >= origin {
            (origin, destination + 1)
        } else {
            (origin, destination)
        }
    }
}

impl Process<Building> for ArrivalGenerator {
    fn name(&self) -> String {
        "arrivals".to_string()
    }

    fn resume(&mut self, ctx: &mut Context<'_, Building>) -> Result<Suspend, SimError> {
        let (origin, destination) = self.pick_trip();
        let id = ctx.world.next_passenger_id();
        let process = ctx.spawn(Box::new(PassengerProcess::new(id)));
        ctx.world
            .admit(Passenger::new(id, process, origin, destination)?)?;
        debug!(
            "t={} {} created: floor {} -> {}",
            ctx.now(),
            id,
            origin,
            destination
        );
        Ok(Suspend::Delay(self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_never_equals_origin() {
        for floors in 2..12 {
            let mut generator = ArrivalGenerator::new(floors, 5, 42 + floors as u64);
            for _ in 0..500 {
                let (origin, destination) = generator.pick_trip();
                assert_ne!(origin, destination);
                assert!(origin < floors);
                assert!(destination < floors);
            }
        }
    }

    #[test]
    fn test_every_floor_pair_is_reachable() {
        let mut generator = ArrivalGenerator::new(3, 5, 7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(generator.pick_trip());
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_same_seed_same_trips() {
        let mut a = ArrivalGenerator::new(10, 5, 99);
        let mut b = ArrivalGenerator::new(10, 5, 99);
        let trips_a: Vec<_> = (0..50).map(|_| a.pick_trip()).collect();
        let trips_b: Vec<_> = (0..50).map(|_| b.pick_trip()).collect();
        assert_eq!(trips_a, trips_b);
    }
}
