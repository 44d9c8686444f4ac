use super::errors::SimError;
use super::event_scheduler::EventScheduler;
use super::types::{ProcessId, ProcessStatus, SimTime};

/// How a process gives control back to the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspend {
    /// Resume automatically after the given duration
    Delay(SimTime),
    /// Sleep until another process activates this one
    Passivate,
    /// Leave the simulation
    Finish,
}

/// A logical unit of control advanced by the engine.
///
/// Implementors are explicit state machines: every call to `resume` runs
/// until the next suspension point and reports how to suspend. Everything a
/// process does between two suspensions is atomic with respect to all
/// other processes.
pub trait Process<W> {
    /// Short label used in log output
    fn name(&self) -> String;

    fn resume(&mut self, ctx: &mut Context<'_, W>) -> Result<Suspend, SimError>;
}

/// Process table and event queue, shared by the engine and running processes
pub(crate) struct Kernel<W> {
    pub(crate) scheduler: EventScheduler,
    pub(crate) processes: Vec<Option<Box<dyn Process<W>>>>,
    pub(crate) status: Vec<ProcessStatus>,
}

impl<W> Kernel<W> {
    pub(crate) fn new() -> Self {
        Self {
            scheduler: EventScheduler::new(),
            processes: Vec::new(),
            status: Vec::new(),
        }
    }

    pub(crate) fn spawn(&mut self, process: Box<dyn Process<W>>, at: SimTime) -> ProcessId {
        let id = ProcessId(self.processes.len());
        let sequence_num = self.scheduler.schedule(id, at);
        self.processes.push(Some(process));
        self.status.push(ProcessStatus::Scheduled { sequence_num });
        id
    }

    pub(crate) fn status(&self, id: ProcessId) -> Result<ProcessStatus, SimError> {
        self.status
            .get(id.0)
            .copied()
            .ok_or_else(|| SimError::NotFound(format!("{} is not registered", id)))
    }

    /// Schedule a wake-up for `id` at `at`, superseding any wake-up it already had
    pub(crate) fn activate(&mut self, id: ProcessId, at: SimTime) -> Result<(), SimError> {
        match self.status(id)? {
            ProcessStatus::Finished => Err(SimError::InvalidOperation(format!(
                "cannot activate {}: it has finished",
                id
            ))),
            ProcessStatus::Current => Err(SimError::InvalidOperation(format!(
                "cannot activate {}: it is the running process",
                id
            ))),
            ProcessStatus::Passive | ProcessStatus::Scheduled { .. } => {
                let sequence_num = self.scheduler.schedule(id, at);
                self.status[id.0] = ProcessStatus::Scheduled { sequence_num };
                Ok(())
            }
        }
    }
}

/// View of the simulation handed to a process while it runs
pub struct Context<'a, W> {
    pub(crate) now: SimTime,
    pub(crate) current: ProcessId,
    pub(crate) kernel: &'a mut Kernel<W>,
    /// Shared model state; unsynchronized, since only one process runs at a time
    pub world: &'a mut W,
}

impl<'a, W> Context<'a, W> {
    /// Current virtual time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Id of the process being resumed
    pub fn current(&self) -> ProcessId {
        self.current
    }

    /// Create a new process; it first runs at the current time, after everything already due
    pub fn spawn(&mut self, process: Box<dyn Process<W>>) -> ProcessId {
        self.kernel.spawn(process, self.now)
    }

    /// Wake `id` at the current time
    pub fn activate(&mut self, id: ProcessId) -> Result<(), SimError> {
        self.kernel.activate(id, self.now)
    }

    /// Wake `id` at a later time
    pub fn activate_at(&mut self, id: ProcessId, at: SimTime) -> Result<(), SimError> {
        if at < self.now {
            return Err(SimError::InvalidOperation(format!(
                "cannot activate {} at {}: time is already {}",
                id, at, self.now
            )));
        }
        self.kernel.activate(id, at)
    }

    pub fn is_passive(&self, id: ProcessId) -> bool {
        matches!(self.kernel.status(id), Ok(ProcessStatus::Passive))
    }
}
