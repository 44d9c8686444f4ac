use super::errors::SimError;
use super::process::{Context, Kernel, Process, Suspend};
use super::types::{ProcessId, ProcessStatus, SimTime};
use log::{trace, warn};

/// Observer trait for simulation events
pub trait SimulationObserver<W> {
    /// Called when virtual time moves forward
    fn on_time_advance(&mut self, _old_time: SimTime, _new_time: SimTime) {}

    /// Called after a process has run up to its next suspension
    fn on_step_complete(&mut self, time: SimTime, process: ProcessId, world: &W);
}

/// Single-threaded cooperative discrete-event engine.
///
/// Owns the shared world `W`, the process table and the event queue, and
/// resumes processes one at a time in (time, scheduling order).
pub struct SimulationEngine<W> {
    kernel: Kernel<W>,
    world: W,
    current_time: SimTime,
    observers: Vec<Box<dyn SimulationObserver<W>>>,
}

impl<W> SimulationEngine<W> {
    /// Create an engine at time zero around the given world
    pub fn new(world: W) -> Self {
        Self {
            kernel: Kernel::new(),
            world,
            current_time: 0,
            observers: Vec::new(),
        }
    }

    /// Register a process; it first runs at the current time
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) -> ProcessId {
        self.kernel.spawn(process, self.current_time)
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver<W>>) {
        self.observers.push(observer);
    }

    /// Notify all observers of a time advance
    fn notify_time_advance(&mut self, old_time: SimTime, new_time: SimTime) {
        for observer in &mut self.observers {
            observer.on_time_advance(old_time, new_time);
        }
    }

    /// Notify all observers of step completion
    fn notify_step_complete(&mut self, process: ProcessId) {
        for observer in &mut self.observers {
            observer.on_step_complete(self.current_time, process, &self.world);
        }
    }

    /// Run every wake-up due strictly before `until`, then set the clock to `until`.
    ///
    /// Processes that are still suspended are left as they are; a later call
    /// picks up where this one stopped.
    pub fn run_until(&mut self, until: SimTime) -> Result<SimTime, SimError> {
        if until < self.current_time {
            return Err(SimError::InvalidOperation(format!(
                "cannot run until {}: time is already {}",
                until, self.current_time
            )));
        }

        while let Some(next_time) = self.kernel.scheduler.peek_next_time() {
            if next_time >= until {
                break;
            }
            self.step()?;
        }

        if until != self.current_time {
            let old_time = self.current_time;
            self.current_time = until;
            self.notify_time_advance(old_time, until);
        }
        Ok(self.current_time)
    }

    /// Run for `duration` time units from now
    pub fn run_for(&mut self, duration: SimTime) -> Result<SimTime, SimError> {
        self.run_until(self.current_time.saturating_add(duration))
    }

    /// Resume the next due process, returns true if events remain
    pub fn step(&mut self) -> Result<bool, SimError> {
        let event = match self.kernel.scheduler.pop_next() {
            Some(event) => event,
            None => return Ok(false),
        };

        // Superseded by a later activation
        let index = event.process.index();
        match self.kernel.status.get(index) {
            Some(ProcessStatus::Scheduled { sequence_num }) if *sequence_num == event.sequence_num => {}
            _ => return Ok(self.has_pending_events()),
        }

        if event.time != self.current_time {
            let old_time = self.current_time;
            self.current_time = event.time;
            self.notify_time_advance(old_time, event.time);
        }

        let mut process = self.kernel.processes[index].take().ok_or_else(|| {
            SimError::InvalidOperation(format!("{} has no body to resume", event.process))
        })?;
        self.kernel.status[index] = ProcessStatus::Current;

        trace!("t={} resuming {} ({})", self.current_time, event.process, process.name());

        let outcome = {
            let mut ctx = Context {
                now: self.current_time,
                current: event.process,
                kernel: &mut self.kernel,
                world: &mut self.world,
            };
            process.resume(&mut ctx)
        };

        let suspend = match outcome {
            Ok(suspend) => suspend,
            Err(err) => {
                // Keep the body so the process can be inspected or activated again
                warn!(
                    "t={} {} ({}) failed: {}",
                    self.current_time,
                    event.process,
                    process.name(),
                    err
                );
                self.kernel.status[index] = ProcessStatus::Passive;
                self.kernel.processes[index] = Some(process);
                return Err(err);
            }
        };

        match suspend {
            Suspend::Delay(duration) => {
                let sequence_num = self
                    .kernel
                    .scheduler
                    .schedule(event.process, self.current_time + duration);
                self.kernel.status[index] = ProcessStatus::Scheduled { sequence_num };
                self.kernel.processes[index] = Some(process);
            }
            Suspend::Passivate => {
                self.kernel.status[index] = ProcessStatus::Passive;
                self.kernel.processes[index] = Some(process);
            }
            Suspend::Finish => {
                self.kernel.status[index] = ProcessStatus::Finished;
            }
        }

        self.notify_step_complete(event.process);

        Ok(self.has_pending_events())
    }

    /// Get current simulation time
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.kernel.scheduler.has_events()
    }

    pub fn status(&self, id: ProcessId) -> Result<ProcessStatus, SimError> {
        self.kernel.status(id)
    }

    /// Number of processes ever spawned
    pub fn process_count(&self) -> usize {
        self.kernel.processes.len()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }
}
