//! Simulation harness helpers: workload traces for the CLI driver.

/// JSON workload trace loading and synthesis.
pub mod trace;

pub use trace::TraceEntry;
