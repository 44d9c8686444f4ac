//! Configuration for elevator simulation runs
//!
//! Values come from three layers: built-in defaults, an optional TOML file,
//! and the positional command-line parameters, later layers winning.
use crate::building::{DispatchPolicy, MAX_LOAD};
use crate::core::{SimError, SimTime};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Durations of the timed holds an elevator goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElevatorTimings {
    /// Travel time between adjacent floors
    pub t_move: SimTime,
    pub t_open: SimTime,
    pub t_close: SimTime,
    /// Hold per boarding passenger
    pub t_enter: SimTime,
    /// Hold after letting riders out
    pub t_exit: SimTime,
}

impl Default for ElevatorTimings {
    fn default() -> Self {
        Self {
            t_move: 10,
            t_open: 2,
            t_close: 2,
            t_enter: 2,
            t_exit: 2,
        }
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub floors: usize,
    pub elevators: usize,
    pub policy: DispatchPolicy,
    pub seed: u64,
    /// Passengers per car
    pub capacity: usize,
    /// Time between two passenger arrivals
    pub arrival_interval: SimTime,
    /// Unmeasured phase that fills the building before statistics start
    pub warmup: SimTime,
    /// Phase whose statistics are reported
    pub measured: SimTime,
    pub timings: ElevatorTimings,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    pub fn new() -> Self {
        Self {
            floors: 10,
            elevators: 1,
            policy: DispatchPolicy::Standard,
            seed: 123456,
            capacity: MAX_LOAD,
            arrival_interval: 5,
            warmup: 1000,
            measured: 50000,
            timings: ElevatorTimings::default(),
        }
    }

    /// Build a configuration from raw command-line integers, rejecting non-positive counts
    pub fn from_args(floors: i64, elevators: i64, policy: i64, seed: i64) -> Result<Self, SimError> {
        Self::new().apply_args(Some(floors), Some(elevators), Some(policy), Some(seed))
    }

    /// Override the given fields with raw command-line values
    pub fn apply_args(
        mut self,
        floors: Option<i64>,
        elevators: Option<i64>,
        policy: Option<i64>,
        seed: Option<i64>,
    ) -> Result<Self, SimError> {
        if let Some(floors) = floors {
            self.floors = positive("floors", floors)?;
        }
        if let Some(elevators) = elevators {
            self.elevators = positive("elevators", elevators)?;
        }
        if let Some(policy) = policy {
            self.policy = DispatchPolicy::try_from(policy)?;
        }
        if let Some(seed) = seed {
            // Any integer is a valid seed; negative values keep their bit pattern
            self.seed = seed as u64;
        }
        self.validate()?;
        Ok(self)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, SimError> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let source = fs::read_to_string(path).map_err(|err| {
            SimError::InvalidConfig(format!("cannot read {}: {}", path.display(), err))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn with_floors(mut self, floors: usize) -> Self {
        self.floors = floors;
        self
    }

    pub fn with_elevators(mut self, elevators: usize) -> Self {
        self.elevators = elevators;
        self
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_arrival_interval(mut self, interval: SimTime) -> Self {
        self.arrival_interval = interval;
        self
    }

    /// Set the unmeasured and measured phase lengths
    pub fn with_horizon(mut self, warmup: SimTime, measured: SimTime) -> Self {
        self.warmup = warmup;
        self.measured = measured;
        self
    }

    pub fn with_timings(mut self, timings: ElevatorTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Check every value a run depends on
    pub fn validate(&self) -> Result<(), SimError> {
        if self.floors < 2 {
            return Err(SimError::InvalidConfig(format!(
                "floors must be at least 2, got {}",
                self.floors
            )));
        }
        if self.elevators < 1 {
            return Err(SimError::InvalidConfig(
                "elevators must be at least 1".to_string(),
            ));
        }
        if self.capacity < 1 {
            return Err(SimError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.arrival_interval < 1 {
            return Err(SimError::InvalidConfig(
                "arrival_interval must be at least 1".to_string(),
            ));
        }
        if self.timings.t_move < 1 {
            return Err(SimError::InvalidConfig(
                "timings.t_move must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Time at which the measured phase ends
    pub fn horizon(&self) -> SimTime {
        self.warmup.saturating_add(self.measured)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn positive(name: &str, value: i64) -> Result<usize, SimError> {
    if value <= 0 {
        return Err(SimError::InvalidConfig(format!(
            "{} must be a positive integer, got {}",
            name, value
        )));
    }
    usize::try_from(value)
        .map_err(|_| SimError::InvalidConfig(format!("{} is too large: {}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.floors, 10);
        assert_eq!(config.elevators, 1);
        assert_eq!(config.policy, DispatchPolicy::Standard);
        assert_eq!(config.capacity, 8);
        assert_eq!(config.arrival_interval, 5);
        assert_eq!(config.horizon(), 51000);
        assert_eq!(config.timings.t_move, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = SimulationConfig::new()
            .with_floors(4)
            .with_elevators(3)
            .with_policy(DispatchPolicy::Priority)
            .with_seed(7)
            .with_horizon(10, 20);

        assert_eq!(config.floors, 4);
        assert_eq!(config.elevators, 3);
        assert_eq!(config.policy, DispatchPolicy::Priority);
        assert_eq!(config.seed, 7);
        assert_eq!(config.horizon(), 30);
    }

    #[test]
    fn test_single_floor_is_rejected() {
        let err = SimulationConfig::new().with_floors(1).validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
        assert!(SimulationConfig::from_args(1, 1, 0, 1).is_err());
    }

    #[test]
    fn test_non_positive_args_are_rejected() {
        assert!(SimulationConfig::from_args(0, 1, 0, 1).is_err());
        assert!(SimulationConfig::from_args(-3, 1, 0, 1).is_err());
        assert!(SimulationConfig::from_args(5, 0, 0, 1).is_err());
        assert!(SimulationConfig::from_args(5, 1, 3, 1).is_err());
    }

    #[test]
    fn test_from_args() {
        let config = SimulationConfig::from_args(6, 2, 1, 99).unwrap();
        assert_eq!(config.floors, 6);
        assert_eq!(config.elevators, 2);
        assert_eq!(config.policy, DispatchPolicy::Priority);
        assert_eq!(config.seed, 99);
    }

    #[test]
    fn test_negative_seed_is_accepted() {
        let config = SimulationConfig::from_args(6, 1, 0, -1).unwrap();
        assert_eq!(config.seed, u64::MAX);

        let other = SimulationConfig::from_args(6, 1, 0, -42).unwrap();
        assert_ne!(config.seed, other.seed);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            policy = "priority"
            warmup = 200
            measured = 800

            [timings]
            t_move = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.policy, DispatchPolicy::Priority);
        assert_eq!(config.horizon(), 1000);
        assert_eq!(config.timings.t_move, 4);
        assert_eq!(config.timings.t_open, 2);
        assert_eq!(config.floors, 10);
    }

    #[test]
    fn test_toml_rejects_unknown_keys() {
        assert!(matches!(
            SimulationConfig::from_toml_str("flors = 3"),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_args_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "floors = 12\nelevators = 2\nseed = 5").unwrap();

        let config = SimulationConfig::load(file.path())
            .unwrap()
            .apply_args(Some(3), None, None, Some(11))
            .unwrap();

        assert_eq!(config.floors, 3);
        assert_eq!(config.elevators, 2);
        assert_eq!(config.seed, 11);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = SimulationConfig::load(Path::new("/nonexistent/lift.toml")).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }
}
