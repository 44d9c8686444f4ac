pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod monitor;
pub mod process;
pub mod simulation_engine;
pub mod types;

// Re-export commonly used types
pub use errors::SimError;
pub use monitor::{LevelMonitor, Tally};
pub use process::{Context, Process, Suspend};
pub use simulation_engine::{SimulationEngine, SimulationObserver};
pub use types::{ProcessId, ProcessStatus, SimTime};
