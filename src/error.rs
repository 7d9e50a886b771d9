//! Error types for input validation and simulator configuration.
//!
//! Conditions that are part of the simulation outcome (a missed EDF
//! deadline, a page fault) are reported as data, never as errors.

use std::fmt;

use crate::types::Pid;

/// Malformed or out-of-range workload input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Burst time was zero or negative.
    NonPositiveBurst { pid: u32, burst: i64 },
    /// Arrival time was negative.
    NegativeArrival { pid: u32, arrival: i64 },
    /// Deadline was not strictly after arrival.
    InvalidDeadline { pid: u32, arrival: i64, deadline: i64 },
    /// A deadline-driven algorithm received a process without a deadline.
    MissingDeadline { pid: Pid },
    /// The same pid appeared more than once.
    DuplicatePid(u32),
    /// A line of text input could not be parsed.
    Malformed { line: usize, reason: String },
    /// Latest arrival plus total burst does not fit in `Time`.
    HorizonOverflow,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositiveBurst { pid, burst } => {
                write!(f, "process {pid}: burst time must be positive, got {burst}")
            }
            ValidationError::NegativeArrival { pid, arrival } => {
                write!(f, "process {pid}: arrival time cannot be negative, got {arrival}")
            }
            ValidationError::InvalidDeadline {
                pid,
                arrival,
                deadline,
            } => write!(
                f,
                "process {pid}: deadline {deadline} must be after arrival {arrival}"
            ),
            ValidationError::MissingDeadline { pid } => {
                write!(f, "{pid} has no deadline")
            }
            ValidationError::DuplicatePid(pid) => write!(f, "duplicate pid {pid}"),
            ValidationError::Malformed { line, reason } => {
                write!(f, "line {line}: {reason}")
            }
            ValidationError::HorizonOverflow => {
                write!(f, "latest arrival plus total burst exceeds the time range")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Invalid algorithm selection or parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Algorithm name not recognized in any category.
    UnknownAlgorithm(String),
    /// Round Robin needs a time quantum.
    MissingQuantum,
    /// A quantum (RR or one MLFQ level) was zero.
    InvalidQuantum { level: Option<usize> },
    /// MLFQ configured with no levels.
    EmptyQueues,
    /// MLFQ boost interval was zero.
    InvalidBoostInterval,
    /// Page replacement needs at least one frame.
    ZeroFrameCapacity,
    /// Metric name not recognized.
    UnknownMetric(String),
    /// Metric exists but is not produced for this run.
    MetricUnavailable(String),
    /// Metric is descriptive and cannot rank algorithms.
    UnrankableMetric(String),
    /// Algorithm does not belong to the requested category.
    CategoryMismatch { algorithm: String, expected: String },
    /// A duel needs at least one algorithm.
    EmptyDuel,
    /// The same algorithm was listed twice in a duel.
    DuplicateAlgorithm(String),
    /// An environment override could not be parsed.
    InvalidEnv { var: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownAlgorithm(name) => write!(f, "unknown algorithm: {name:?}"),
            ConfigError::MissingQuantum => write!(f, "round robin requires a time quantum"),
            ConfigError::InvalidQuantum { level: None } => {
                write!(f, "time quantum must be positive")
            }
            ConfigError::InvalidQuantum { level: Some(l) } => {
                write!(f, "quantum of queue level {l} must be positive")
            }
            ConfigError::EmptyQueues => write!(f, "MLFQ requires at least one queue level"),
            ConfigError::InvalidBoostInterval => write!(f, "boost interval must be positive"),
            ConfigError::ZeroFrameCapacity => write!(f, "frame capacity must be at least 1"),
            ConfigError::UnknownMetric(name) => write!(f, "unknown metric: {name:?}"),
            ConfigError::MetricUnavailable(name) => {
                write!(f, "metric {name:?} is not available for this run")
            }
            ConfigError::UnrankableMetric(name) => {
                write!(f, "metric {name:?} cannot be used for ranking")
            }
            ConfigError::CategoryMismatch {
                algorithm,
                expected,
            } => write!(f, "algorithm {algorithm:?} is not a {expected} algorithm"),
            ConfigError::EmptyDuel => write!(f, "a duel needs at least one algorithm"),
            ConfigError::DuplicateAlgorithm(name) => {
                write!(f, "algorithm {name:?} listed more than once")
            }
            ConfigError::InvalidEnv { var, reason } => write!(f, "{var}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Any failure produced by a simulation entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    Validation(ValidationError),
    Config(ConfigError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Validation(e) => write!(f, "invalid input: {e}"),
            SimError::Config(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Validation(e) => Some(e),
            SimError::Config(e) => Some(e),
        }
    }
}

impl From<ValidationError> for SimError {
    fn from(e: ValidationError) -> Self {
        SimError::Validation(e)
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}
