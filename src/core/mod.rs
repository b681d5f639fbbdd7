//! The scheduler core: timing trackers, bank machines, arbitration,
//! steering, refresh sequencing, and the top-level controller.
//!
//! The core is purely synchronous: a single [`Controller::step`] call
//! advances every component one cycle in lockstep, with no concurrency
//! primitives involved.

/// Per-bank state machines.
pub mod bank;

/// Round-robin command chooser.
pub mod chooser;

/// Top-level controller composition and cycle loop.
pub mod controller;

/// Periodic refresh sequencer.
pub mod refresher;

/// Command steering onto output phases.
pub mod steerer;

/// Timing constraint trackers.
pub mod timing;

pub use bank::{BankEvents, BankFsmState, BankMachine, BankOutput};
pub use chooser::{CommandChooser, WantFlags};
pub use controller::{Controller, CycleOutput, Mode};
pub use refresher::{RefreshOutput, Refresher};
pub use steerer::{SteerSel, Steerer};
pub use timing::{TfawWindow, TxxdTimer};
