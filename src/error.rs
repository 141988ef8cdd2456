//! Crate-wide error type for configuration, schedule, and numerical failures.

use std::error;
use std::fmt;

/// Failure raised while building models, resolving attack schedules, or
/// discretizing.
///
/// All variants are raised eagerly, before any time series is produced: a
/// simulation either runs the full horizon for every area or never starts.
/// Invalid parameters are never substituted with defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Inconsistent or non-physical configuration (mismatched array lengths,
    /// non-positive time constants, participation factors not summing to 1,
    /// non-positive time step, malformed tie-line matrix).
    Config {
        /// Dotted field path (e.g., `"areas[1].tg"`).
        field: String,
        /// Human-readable constraint description.
        message: String,
    },
    /// Malformed attack-window sequence for one area (overlapping,
    /// out-of-order, or not covering the horizon).
    Schedule {
        /// Zero-based area index the offending window list belongs to.
        area: usize,
        /// Human-readable constraint description.
        message: String,
    },
    /// Discretization or matrix-algebra failure. The computation is
    /// deterministic, so a failed run is never retried.
    Numerical {
        /// Human-readable failure description.
        message: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::Config`] with owned strings.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::Schedule`].
    pub fn schedule(area: usize, message: impl Into<String>) -> Self {
        Error::Schedule {
            area,
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::Numerical`].
    pub fn numerical(message: impl Into<String>) -> Self {
        Error::Numerical {
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config { field, message } => {
                write!(f, "config error: {field} — {message}")
            }
            Error::Schedule { area, message } => {
                write!(f, "schedule error: area {area} — {message}")
            }
            Error::Numerical { message } => {
                write!(f, "numerical error: {message}")
            }
        }
    }
}

impl error::Error for Error {}
