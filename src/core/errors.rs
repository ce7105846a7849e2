/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Burst, Pid};
use crate::process::ProcessState;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Scheduler construction result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Process-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Invalid burst {burst} for process {pid}: must be greater than zero")]
    #[diagnostic(
        code(process::invalid_burst),
        help("Every process needs at least one tick of CPU work.")
    )]
    InvalidBurst { pid: Pid, burst: i64 },

    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process may have terminated or never existed. Check PID validity.")
    )]
    NotFound(Pid),

    #[error("Process {pid}: invalid state transition {from:?} -> {to:?}")]
    #[diagnostic(
        code(process::invalid_transition),
        help("Operation cannot be performed in current process state.")
    )]
    InvalidTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },

    #[error("Process {0} already exists in this run")]
    #[diagnostic(
        code(process::duplicate_pid),
        help("PIDs are never reused within a run. Allocate a fresh PID.")
    )]
    DuplicatePid(Pid),
}

impl ProcessError {
    /// Whether the error only means the target went away (benign UI race)
    #[inline]
    pub const fn is_stale_target(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidTransition { .. })
    }
}

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Unknown scheduling algorithm '{0}'")]
    #[diagnostic(
        code(scheduler::unknown_algorithm),
        help("Valid: fcfs, priority, priority_preemptive, sjf, rr.")
    )]
    UnknownAlgorithm(String),

    #[error("Round-robin requires a quantum")]
    #[diagnostic(
        code(scheduler::missing_quantum),
        help("Set a quantum of at least one tick for round-robin runs.")
    )]
    MissingQuantum,

    #[error("Invalid quantum {0}: must be at least one tick")]
    #[diagnostic(code(scheduler::invalid_quantum))]
    InvalidQuantum(u32),
}

/// Configuration validation errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Arrival probability {0} outside [0, 1]")]
    #[diagnostic(code(config::invalid_probability))]
    InvalidProbability(f64),

    #[error("Invalid {name} range [{min}, {max}]")]
    #[diagnostic(
        code(config::invalid_range),
        help("Ranges need 1 <= min <= max.")
    )]
    InvalidRange { name: String, min: u32, max: u32 },

    #[error("Tick interval must be positive")]
    #[diagnostic(code(config::invalid_tick_interval))]
    InvalidTickInterval,

    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(
        code(config::parse),
        help("Configuration files are JSON objects with snake_case keys.")
    )]
    Parse(String),
}

/// Metrics export errors
#[derive(Error, Debug, Diagnostic)]
pub enum MetricsError {
    #[error("Metrics export I/O failed: {0}")]
    #[diagnostic(
        code(metrics::io),
        help("Check file permissions and disk space.")
    )]
    Io(#[from] std::io::Error),

    #[error("Metrics serialization failed: {0}")]
    #[diagnostic(code(metrics::serialize))]
    Serialize(#[from] serde_json::Error),
}

/// Unified simulation error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum SimulationError {
    #[error("Process error: {0}")]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Operation requires {expected} mode")]
    #[diagnostic(
        code(simulation::wrong_mode),
        help("Coordinated engines are ticked by their driver and cannot be started.")
    )]
    WrongMode { expected: &'static str },

    #[error("Simulation already running")]
    #[diagnostic(code(simulation::already_running))]
    AlreadyRunning,

    #[error("Simulation not running")]
    #[diagnostic(code(simulation::not_running))]
    NotRunning,

    #[error("Internal error: {0}")]
    #[diagnostic(
        code(simulation::internal),
        help("An unexpected internal error occurred. Please report this issue.")
    )]
    Internal(String),
}

impl From<String> for SimulationError {
    fn from(msg: String) -> Self {
        SimulationError::Internal(msg)
    }
}

/// Convenience guard used by construction-time validation
pub(crate) fn ensure_positive_burst(pid: Pid, burst: i64) -> ProcessResult<Burst> {
    if burst <= 0 || burst > i64::from(Burst::MAX) {
        return Err(ProcessError::InvalidBurst { pid, burst });
    }
    Ok(burst as Burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_target_classification() {
        assert!(ProcessError::NotFound(3).is_stale_target());
        assert!(ProcessError::InvalidTransition {
            pid: 1,
            from: ProcessState::Terminated,
            to: ProcessState::Suspended,
        }
        .is_stale_target());
        assert!(!ProcessError::DuplicatePid(1).is_stale_target());
    }

    #[test]
    fn test_burst_guard() {
        assert_eq!(ensure_positive_burst(1, 4), Ok(4));
        assert!(ensure_positive_burst(1, 0).is_err());
        assert!(ensure_positive_burst(1, -3).is_err());
    }

    #[test]
    fn test_errors_serialize_tagged() {
        let json = serde_json::to_string(&SchedulerError::MissingQuantum).unwrap();
        assert!(json.contains("missing_quantum"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: SimulationError = SchedulerError::UnknownAlgorithm("lottery".into()).into();
        assert!(err.to_string().contains("lottery"));
    }
}
