/// Errors that can occur while configuring, running or reporting a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Rejected configuration value; the run never starts
    InvalidConfig(String),
    /// A process or model operation that breaks a scheduling or model invariant
    InvalidOperation(String),
    /// Lookup of a process, passenger, floor or car that does not exist
    NotFound(String),
    /// Failure while writing result artifacts
    Output(String),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            SimError::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
            SimError::NotFound(msg) => write!(f, "Not found: {}", msg),
            SimError::Output(msg) => write!(f, "Output error: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Output(err.to_string())
    }
}

impl From<csv::Error> for SimError {
    fn from(err: csv::Error) -> Self {
        SimError::Output(err.to_string())
    }
}

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        SimError::InvalidConfig(err.to_string())
    }
}
