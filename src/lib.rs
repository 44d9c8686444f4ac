pub mod building;
pub mod config;
pub mod core;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use crate::building::{Building, DispatchPolicy, Direction};
pub use crate::config::{ElevatorTimings, SimulationConfig};
pub use crate::core::{SimError, SimTime};
pub use crate::report::SimulationReport;
pub use crate::runner::{compare_policies, run_simulation, ElevatorSimulation, PolicyComparison};
