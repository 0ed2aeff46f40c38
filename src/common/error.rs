use thiserror::Error;

/// Failure reported by the material-extrusion actuator.
#[derive(Error, Debug)]
pub enum ActuatorError {
    #[error("Extruder rejected command: {reason}")]
    CommandRejected { reason: String },

    #[error("Extruder unreachable: {0}")]
    Unreachable(String),
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Malformed print path at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Print path contains no waypoints")]
    EmptyMission,

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Actuator command failed: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("Flight controller error: {0}")]
    FlightController(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

/// Terminal failure of one mission run. Distinguishes aborts before any
/// vehicle motion from in-flight aborts that may need manual recovery.
#[derive(Error, Debug)]
pub enum MissionError {
    #[error("Mission aborted before any vehicle motion: {0}")]
    PreFlightAbort(DomainError),

    #[error("Mission aborted in flight (recovered: {recovered}): {source}")]
    InFlightAbort { source: DomainError, recovered: bool },
}

pub type DomainResult<T> = Result<T, DomainError>;
