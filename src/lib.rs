//! Cycle-Accurate DRAM Memory-Controller Scheduler.
//!
//! This crate implements the scheduling core of a DRAM memory controller as
//! a pure, discrete-time software model: given a stream of read/write
//! requests and a set of DRAM timing parameters, it decides which DRAM
//! command to issue each cycle while obeying all timing constraints.
//!
//! # Architecture
//!
//! * **Bank machines**: one FSM per bank tracking the open row, inserting
//!   activate/precharge commands and enforcing per-bank timings (tRC, tRAS,
//!   write-to-precharge).
//! * **Arbitration**: two round-robin choosers (bank commands and data
//!   commands) gated by the cross-bank timings (tRRD, tFAW, tCCD, tWTR) and
//!   the controller's read/write turnaround FSM with anti-starvation
//!   budgets.
//! * **Refresh**: a periodic sequencer running PRECHARGE-ALL → AUTO-REFRESH
//!   after a rendezvous across all banks.
//! * **Steering**: the chosen commands are mapped onto per-phase outputs
//!   with rank decoding.
//!
//! The model is single-threaded and lockstep: one
//! [`Controller::step`](core::Controller::step) call is one clock cycle.
//! There is no failure mode at runtime — under timing pressure the
//! scheduler simply issues nothing for a cycle.
//!
//! # Modules
//!
//! * `common`: command/request types, address mapping, error types.
//! * `config`: TOML configuration loading and validation.
//! * `core`: the scheduler core (timing, banks, arbitration, refresh).
//! * `sim`: workload trace loading for the CLI driver.
//! * `stats`: statistics collection and reporting.

/// Shared command, request, address, and error types.
pub mod common;

/// Configuration system for geometry, timing, PHY, and controller policy.
pub mod config;

/// The scheduler core.
pub mod core;

/// Simulation harness helpers.
pub mod sim;

/// Statistics collection and reporting.
pub mod stats;
