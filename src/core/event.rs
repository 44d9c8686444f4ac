use super::types::{ProcessId, SimTime};

/// A pending wake-up of one process at an absolute virtual time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeEvent {
    pub time: SimTime,
    pub sequence_num: u64,
    pub process: ProcessId,
}

impl WakeEvent {
    pub fn new(time: SimTime, sequence_num: u64, process: ProcessId) -> Self {
        Self {
            time,
            sequence_num,
            process,
        }
    }
}
