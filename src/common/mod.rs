//! Common types used throughout the DRAM scheduler.
//!
//! This module provides the command and request vocabulary, address
//! mapping, and error types shared by the scheduler core, the simulation
//! driver, and the tests.

/// Linear address to (bank, row, col) mapping.
pub mod addr;

/// DRAM command and request type definitions.
pub mod cmd;

/// Configuration and submission error types.
pub mod error;

pub use addr::AddressMapper;
pub use cmd::{ChipSelect, Command, CommandKind, PhaseCommand, Request, RequestId};
pub use error::{ConfigError, SubmitError};
