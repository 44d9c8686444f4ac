/// Virtual time, in whole simulation time units
pub type SimTime = u64;

/// Identifier of a simulated process, assigned in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub(crate) usize);

impl ProcessId {
    /// Get the raw index of this process
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "process#{}", self.0)
    }
}

/// Lifecycle state of a process as seen by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Waiting for a wake-up that is in the event queue
    Scheduled { sequence_num: u64 },
    /// Currently being resumed by the engine
    Current,
    /// Suspended with no wake-up; only an explicit activation resumes it
    Passive,
    /// Returned `Suspend::Finish`, never resumed again
    Finished,
}
