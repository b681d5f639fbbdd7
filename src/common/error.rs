//! Error types for configuration and request submission.
//!
//! The error taxonomy is narrow because the domain is closed-form
//! scheduling, not I/O: configuration problems are caught once at
//! construction, and the only runtime error is queue backpressure. A cycle
//! where no command issues is not an error; it is the normal behavior under
//! timing pressure.

use std::error::Error;
use std::fmt;

/// Error raised when the configuration is internally inconsistent.
///
/// Returned by [`Config::validate`](crate::config::Config::validate) and by
/// [`Controller::new`](crate::core::Controller::new).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A geometry field that must be a power of two is not.
    NotPowerOfTwo {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },
    /// A timing or geometry field that must be nonzero is zero.
    ZeroField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A timing parameter required by an enabled feature is unset.
    MissingTiming {
        /// Name of the missing timing parameter.
        field: &'static str,
        /// The feature that requires it.
        required_by: &'static str,
    },
    /// A phase index does not fit the configured number of phases.
    PhaseOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected phase index.
        value: u64,
        /// Configured number of phases.
        nphases: u64,
    },
    /// A field exceeds the width the model's trackers can represent.
    FieldTooLarge {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// Largest supported value.
        max: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPowerOfTwo { field, value } => {
                write!(f, "{field} must be a power of two, got {value}")
            }
            Self::ZeroField { field } => write!(f, "{field} must be nonzero"),
            Self::MissingTiming { field, required_by } => {
                write!(f, "{field} must be set when {required_by} is enabled")
            }
            Self::PhaseOutOfRange {
                field,
                value,
                nphases,
            } => write!(f, "{field} is {value} but only {nphases} phases are configured"),
            Self::FieldTooLarge { field, value, max } => {
                write!(f, "{field} is {value}, above the supported maximum of {max}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Error raised by [`Controller::submit`](crate::core::Controller::submit).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The target bank's request queue is at `cmd_buffer_depth`.
    ///
    /// Mirrors hardware backpressure on the ready/valid handshake: the
    /// caller must hold the request and retry on a later cycle.
    QueueFull {
        /// The bank whose queue is full.
        bank: u32,
    },
    /// The request names a bank outside the configured geometry.
    BankOutOfRange {
        /// The rejected bank index.
        bank: u32,
        /// Total number of banks (all ranks).
        nbanks: u32,
    },
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull { bank } => write!(f, "bank {bank} request queue is full"),
            Self::BankOutOfRange { bank, nbanks } => {
                write!(f, "bank {bank} out of range (0..{nbanks})")
            }
        }
    }
}

impl Error for SubmitError {}
