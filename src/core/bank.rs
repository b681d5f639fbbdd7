//! Per-bank state machine.
//!
//! A `BankMachine` abstracts a single DRAM bank by tracking the currently
//! open row and converting the bank's queued requests into candidate
//! commands for the arbiter, inserting any needed activate/precharge
//! commands (with optional lookahead auto-precharge). It enforces the
//! per-bank timings (tRC, tRAS, write-to-precharge); cross-bank timings
//! (tRRD, tFAW, tCCD, tWTR) are enforced by the controller's arbitration.
//!
//! Each cycle the machine is evaluated in two phases, mirroring the
//! combinational/registered split of synchronous logic: [`BankMachine::outputs`]
//! proposes at most one command from the post-tick state, and after
//! arbitration [`BankMachine::commit`] computes the state that becomes
//! visible next cycle.

use std::collections::VecDeque;

use crate::common::{Command, Request, RequestId, SubmitError};
use crate::config::Config;
use crate::core::timing::TxxdTimer;

/// Explicit FSM states of one bank.
///
/// `Trcd` and `Trp` are delayed-entry wait states: the machine sits in them
/// for `tRCD - 1` (resp. `tRP - 1`) cycles after the triggering command was
/// accepted, so the follow-up command issues exactly tRCD (resp. tRP)
/// cycles later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankFsmState {
    /// No row open; propose ACTIVATE for the head request (initial state).
    Activate,
    /// Waiting out the row-to-column delay after an ACTIVATE.
    Trcd,
    /// Row open; propose READ/WRITE on a hit, close the row on a miss.
    Regular,
    /// Waiting for precharge timing, then proposing an explicit PRECHARGE.
    Precharge,
    /// Waiting for precharge timing after an auto-precharging column
    /// command; no explicit command is issued.
    AutoPrecharge,
    /// Waiting out the precharge time before the next ACTIVATE.
    Trp,
    /// Holding for a refresh; no bank command until the request deasserts.
    Refresh,
}

/// Combinational outputs of one bank for one cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct BankOutput {
    /// Candidate command proposed this cycle, if any.
    pub cmd: Option<Command>,
    /// Refresh handshake: the bank is parked and precharge timing is clear.
    pub refresh_gnt: bool,
}

/// State-change events reported by [`BankMachine::commit`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BankEvents {
    /// Request whose data phase was accepted this cycle.
    pub completed: Option<(RequestId, bool)>,
    /// The head request hit the open row and its column command was issued.
    pub row_hit: bool,
    /// The head request missed the open row; the bank starts closing it.
    pub row_miss: bool,
    /// An accepted column command carried the auto-precharge flag.
    pub auto_precharged: bool,
}

/// State machine converting one bank's requests into DRAM commands.
pub struct BankMachine {
    index: u32,
    state: BankFsmState,
    /// Remaining cycles in a delayed-entry wait state (`Trcd`/`Trp`).
    wait: u64,
    open_row: Option<u32>,
    queue: VecDeque<(RequestId, Request)>,
    depth: usize,
    /// Write-to-precharge gate (write latency + tWR + tCCD).
    twtp: TxxdTimer,
    /// Activate-to-activate gate, same bank.
    trc: TxxdTimer,
    /// Activate-to-precharge gate.
    tras: TxxdTimer,
    t_rcd: u64,
    t_rp: u64,
    with_auto_precharge: bool,
}

impl BankMachine {
    /// Creates the machine for global bank `index`.
    pub fn new(index: u32, config: &Config) -> Self {
        Self {
            index,
            state: BankFsmState::Activate,
            wait: 0,
            open_row: None,
            queue: VecDeque::with_capacity(config.controller.cmd_buffer_depth),
            depth: config.controller.cmd_buffer_depth,
            twtp: TxxdTimer::new(config.write_to_precharge()),
            trc: TxxdTimer::new(config.timing.t_rc),
            tras: TxxdTimer::new(config.timing.t_ras),
            t_rcd: config.timing.t_rcd,
            t_rp: config.timing.t_rp,
            with_auto_precharge: config.controller.with_auto_precharge,
        }
    }

    /// Queues a request on this bank.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::QueueFull`] when the queue already holds
    /// `cmd_buffer_depth` requests; the caller must back off and retry.
    pub fn enqueue(&mut self, id: RequestId, request: Request) -> Result<(), SubmitError> {
        if self.queue.len() >= self.depth {
            return Err(SubmitError::QueueFull { bank: self.index });
        }
        self.queue.push_back((id, request));
        Ok(())
    }

    /// Ticks the bank's timing trackers. Called once per cycle, first.
    pub fn tick_timers(&mut self) {
        self.twtp.tick();
        self.trc.tick();
        self.tras.tick();
    }

    /// Proposes this cycle's candidate command from current state.
    ///
    /// Pure with respect to bank state: a rejected candidate is regenerated
    /// next cycle, not queued. Timing gates are structural — a command is
    /// simply not proposed while any of its gating trackers is counting.
    pub fn outputs(&self, refresh_req: bool) -> BankOutput {
        let mut out = BankOutput::default();
        match self.state {
            BankFsmState::Activate => {
                if !refresh_req && self.trc.ready() {
                    if let Some((_, req)) = self.queue.front() {
                        out.cmd = Some(Command::activate(self.index, req.row));
                    }
                }
            }
            BankFsmState::Regular => {
                if !refresh_req {
                    if let Some((_, req)) = self.queue.front() {
                        if self.open_row == Some(req.row) {
                            out.cmd = Some(Command::column(
                                self.index,
                                req.col,
                                req.is_write,
                                self.auto_precharge_wanted(),
                            ));
                        }
                    }
                }
            }
            BankFsmState::Precharge => {
                if self.twtp.ready() && self.tras.ready() {
                    out.cmd = Some(Command::precharge(self.index));
                }
            }
            BankFsmState::Refresh => {
                out.refresh_gnt = self.twtp.ready();
            }
            BankFsmState::Trcd | BankFsmState::AutoPrecharge | BankFsmState::Trp => {}
        }
        out
    }

    /// Applies this cycle's transition; `accepted` reports arbitration of
    /// the command proposed by [`outputs`](Self::outputs) this same cycle.
    pub fn commit(&mut self, refresh_req: bool, accepted: bool) -> BankEvents {
        let mut events = BankEvents::default();
        match self.state {
            BankFsmState::Activate => {
                if refresh_req {
                    self.park_for_refresh();
                } else if accepted {
                    if let Some(&(_, req)) = self.queue.front() {
                        // Row latched; both activate-relative gates start now.
                        self.open_row = Some(req.row);
                        self.trc.start();
                        self.tras.start();
                        self.enter_wait(BankFsmState::Trcd, self.t_rcd, BankFsmState::Regular);
                    }
                }
            }
            BankFsmState::Trcd => {
                self.wait -= 1;
                if self.wait == 0 {
                    self.state = BankFsmState::Regular;
                }
            }
            BankFsmState::Regular => {
                if refresh_req {
                    self.park_for_refresh();
                } else if let Some(&(id, req)) = self.queue.front() {
                    if self.open_row == Some(req.row) {
                        if accepted {
                            let auto_precharge = self.auto_precharge_wanted();
                            if req.is_write {
                                self.twtp.start();
                            }
                            let _ = self.queue.pop_front();
                            events.completed = Some((id, req.is_write));
                            events.row_hit = true;
                            if auto_precharge {
                                events.auto_precharged = true;
                                self.open_row = None;
                                self.state = BankFsmState::AutoPrecharge;
                            }
                        }
                    } else if self.open_row.is_some() {
                        events.row_miss = true;
                        self.open_row = None;
                        self.state = BankFsmState::Precharge;
                    } else {
                        self.state = BankFsmState::Activate;
                    }
                }
            }
            BankFsmState::Precharge => {
                if accepted {
                    self.enter_wait(BankFsmState::Trp, self.t_rp, BankFsmState::Activate);
                }
            }
            BankFsmState::AutoPrecharge => {
                // Same gates as an explicit precharge; the close was already
                // encoded in the column command's A10 bit.
                if self.twtp.ready() && self.tras.ready() {
                    self.enter_wait(BankFsmState::Trp, self.t_rp, BankFsmState::Activate);
                }
            }
            BankFsmState::Trp => {
                self.wait -= 1;
                if self.wait == 0 {
                    self.state = BankFsmState::Activate;
                }
            }
            BankFsmState::Refresh => {
                if !refresh_req {
                    self.state = BankFsmState::Activate;
                }
            }
        }
        events
    }

    /// Current FSM state.
    pub fn state(&self) -> BankFsmState {
        self.state
    }

    /// Currently open row, if any.
    pub fn open_row(&self) -> Option<u32> {
        self.open_row
    }

    /// Whether the head request targets the open row.
    pub fn row_hit(&self) -> bool {
        match (self.queue.front(), self.open_row) {
            (Some((_, req)), Some(row)) => req.row == row,
            _ => false,
        }
    }

    /// Number of queued requests.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Lookahead auto-precharge policy: close the row with the column
    /// command only when the next queued request targets a different row.
    /// Consecutive same-row requests keep the row open.
    fn auto_precharge_wanted(&self) -> bool {
        if !self.with_auto_precharge {
            return false;
        }
        match (self.queue.front(), self.queue.get(1)) {
            (Some((_, head)), Some((_, next))) => next.row != head.row,
            _ => false,
        }
    }

    fn park_for_refresh(&mut self) {
        self.open_row = None;
        self.state = BankFsmState::Refresh;
    }

    /// Delayed entry: `interval <= 1` skips the wait state entirely, so the
    /// follow-up command issues exactly `interval` cycles after the trigger.
    fn enter_wait(&mut self, wait_state: BankFsmState, interval: u64, direct: BankFsmState) {
        if interval <= 1 {
            self.state = direct;
        } else {
            self.state = wait_state;
            self.wait = interval - 1;
        }
    }
}
