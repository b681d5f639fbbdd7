//! Periodic refresh sequencer.
//!
//! A free-running tREFI countdown raises a refresh request; the controller
//! grants it once every bank has parked (the refresh rendezvous). On grant
//! the sequencer runs the timed PRECHARGE-ALL → wait tRP → AUTO-REFRESH →
//! wait tRFC sequence on the refresh command slot, keeping the request
//! asserted until the sequence completes so normal traffic stays gated.

use crate::common::Command;
use crate::config::Config;

/// Refresh sequencer FSM states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RefreshState {
    /// Counting down to the next refresh interval.
    Idle,
    /// Request asserted, waiting for the controller's grant.
    WaitGrant,
    /// Running the precharge-all / auto-refresh timeline.
    WaitSeq,
}

/// Outputs of the refresher for one cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefreshOutput {
    /// Refresh request, broadcast to every bank machine.
    pub request: bool,
    /// Command to drive on the refresh slot this cycle, if any.
    pub cmd: Option<Command>,
    /// The sequence finished this cycle; traffic may resume next cycle.
    pub done: bool,
}

/// Generates periodic refresh sequences.
pub struct Refresher {
    state: RefreshState,
    enabled: bool,
    t_refi: u64,
    t_rp: u64,
    t_rfc: u64,
    /// tREFI countdown, reloaded every time it reaches zero.
    count: u64,
    /// Cycles since the grant while in `WaitSeq`.
    elapsed: u64,
}

impl Refresher {
    /// Creates the sequencer; disabled entirely when `with_refresh` is off.
    pub fn new(config: &Config) -> Self {
        Self {
            state: RefreshState::Idle,
            enabled: config.controller.with_refresh,
            t_refi: config.timing.t_refi,
            t_rp: config.timing.t_rp,
            t_rfc: config.timing.t_rfc,
            count: config.timing.t_refi.saturating_sub(1),
            elapsed: 0,
        }
    }

    /// Advances the sequencer one cycle.
    ///
    /// `granted` is the controller's refresh grant (asserted while its
    /// top-level FSM sits in the refresh mode).
    pub fn step(&mut self, granted: bool) -> RefreshOutput {
        let mut out = RefreshOutput::default();
        let expired = self.tick_timer();
        match self.state {
            RefreshState::Idle => {
                if expired {
                    self.state = RefreshState::WaitGrant;
                }
            }
            RefreshState::WaitGrant => {
                out.request = true;
                if granted {
                    self.elapsed = 0;
                    self.state = RefreshState::WaitSeq;
                }
            }
            RefreshState::WaitSeq => {
                self.elapsed += 1;
                if self.elapsed == 1 {
                    // Close every open row before the refresh proper.
                    out.cmd = Some(Command::precharge_all());
                } else if self.elapsed == 1 + self.t_rp {
                    out.cmd = Some(Command::refresh());
                }
                if self.elapsed == 1 + self.t_rp + self.t_rfc {
                    out.done = true;
                    self.state = RefreshState::Idle;
                } else {
                    out.request = true;
                }
            }
        }
        out
    }

    /// Free-running interval countdown; returns `true` on expiry. Expiries
    /// while a sequence is already pending are absorbed.
    fn tick_timer(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        if self.count == 0 {
            // Reload to tREFI - 1 so expiries land exactly tREFI apart.
            self.count = self.t_refi.saturating_sub(1);
            true
        } else {
            self.count -= 1;
            false
        }
    }
}
