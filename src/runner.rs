use crate::building::{ArrivalGenerator, Building, DispatchPolicy, ElevatorProcess};
use crate::config::SimulationConfig;
use crate::core::{SimError, SimulationEngine, SimulationObserver};
use crate::report::SimulationReport;
use log::{info, warn};

/// A configured building and its processes, ready to run
pub struct ElevatorSimulation {
    engine: SimulationEngine<Building>,
    config: SimulationConfig,
}

impl ElevatorSimulation {
    /// Validate `config` and set up the generator and one process per car.
    ///
    /// The generator is spawned before the elevators, so at time zero it
    /// runs first and the cars go idle before the first passenger calls them.
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;

        let building = Building::new(
            config.floors,
            config.elevators,
            config.policy,
            config.capacity,
        );
        let mut engine = SimulationEngine::new(building);

        engine.spawn(Box::new(ArrivalGenerator::new(
            config.floors,
            config.arrival_interval,
            config.seed,
        )));
        for car in 0..config.elevators {
            let process = engine.spawn(Box::new(ElevatorProcess::new(car, config.timings)));
            engine.world_mut().register_elevator(process);
        }

        Ok(Self { engine, config })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver<Building>>) {
        self.engine.add_observer(observer);
    }

    pub fn engine(&self) -> &SimulationEngine<Building> {
        &self.engine
    }

    pub fn building(&self) -> &Building {
        self.engine.world()
    }

    /// Run the warm-up phase, reset statistics, run the measured phase and report
    pub fn run(&mut self) -> Result<SimulationReport, SimError> {
        info!(
            "Starting {} simulation: {} floors, {} elevators, seed {}",
            self.config.policy, self.config.floors, self.config.elevators, self.config.seed
        );

        let warmup_end = self.engine.run_until(self.config.warmup)?;
        self.engine.world_mut().reset_statistics(warmup_end);
        info!(
            "Warm-up finished at t={} with {} passengers waiting",
            warmup_end,
            self.engine.world().waiting_count()
        );

        let end = self.engine.run_until(self.config.horizon())?;
        let report = SimulationReport::from_building(self.engine.world(), self.config.policy, end);

        if report.still_waiting > 0 {
            warn!(
                "{} passengers were still waiting at t={}",
                report.still_waiting, end
            );
        }
        info!(
            "Finished at t={}: {} wait samples, mean wait {:.3}",
            end,
            report.total_samples(),
            report.overall_mean_wait()
        );
        Ok(report)
    }
}

/// Run one complete simulation for `config`
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationReport, SimError> {
    ElevatorSimulation::new(config.clone())?.run()
}

/// Reports of the same arrival sequence served by both policies
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyComparison {
    pub standard: SimulationReport,
    pub priority: SimulationReport,
}

impl PolicyComparison {
    /// The policy with the lower building-wide mean wait; ties favour standard
    pub fn better_policy(&self) -> DispatchPolicy {
        if self.priority.overall_mean_wait() < self.standard.overall_mean_wait() {
            DispatchPolicy::Priority
        } else {
            DispatchPolicy::Standard
        }
    }
}

/// Run `config` under both policies in parallel; the seed is shared so arrivals are identical
pub fn compare_policies(config: &SimulationConfig) -> Result<PolicyComparison, SimError> {
    let standard_config = config.clone().with_policy(DispatchPolicy::Standard);
    let priority_config = config.clone().with_policy(DispatchPolicy::Priority);

    let (standard, priority) = rayon::join(
        || run_simulation(&standard_config),
        || run_simulation(&priority_config),
    );

    Ok(PolicyComparison {
        standard: standard?,
        priority: priority?,
    })
}
