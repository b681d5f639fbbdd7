//! Top-level controller: composition and per-cycle scheduling loop.
//!
//! The controller owns one bank machine per bank, the two command choosers,
//! the steerer, and the refresh sequencer, and advances them in lockstep —
//! the software equivalent of all synchronous blocks firing on one clock
//! edge. Within a cycle the order is fixed: timing trackers tick first,
//! bank machines then propose from post-tick state, arbitration picks this
//! cycle's winners, steering produces the phase outputs, and state
//! mutations land for the next cycle.

use crate::common::{
    Command, CommandKind, ConfigError, PhaseCommand, Request, RequestId, SubmitError,
};
use crate::config::Config;
use crate::core::bank::BankMachine;
use crate::core::chooser::{CommandChooser, WantFlags};
use crate::core::refresher::Refresher;
use crate::core::steerer::{SteerSel, Steerer};
use crate::core::timing::{TfawWindow, TxxdTimer};
use crate::stats::SchedStats;

/// Top-level controller FSM modes.
///
/// `Rtw` and `Wtr` are the read/write turnaround bubbles: `Rtw` is a fixed
/// delay covering the read latency, `Wtr` waits on the tWTR tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Servicing reads; row commands allowed.
    Read,
    /// Servicing writes; row commands allowed.
    Write,
    /// Read-to-write turnaround bubble.
    Rtw,
    /// Write-to-read turnaround bubble.
    Wtr,
    /// Refresh sequence in progress; all bank traffic gated.
    Refresh,
}

/// Everything the controller produced in one cycle.
#[derive(Clone, Debug)]
pub struct CycleOutput {
    /// Index of the simulated cycle.
    pub cycle: u64,
    /// Logical commands accepted this cycle (at most one bank command, one
    /// data command, and the refresh slot).
    pub commands: Vec<Command>,
    /// Per-phase command outputs after steering and rank decode.
    pub phases: Vec<PhaseCommand>,
    /// Requests whose data phase was accepted this cycle.
    pub completed: Vec<RequestId>,
}

impl CycleOutput {
    /// `true` when the cycle issued nothing (a scheduling bubble).
    pub fn is_bubble(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Cycle-accurate DRAM scheduler.
pub struct Controller {
    config: Config,
    banks: Vec<BankMachine>,
    choose_cmd: CommandChooser,
    choose_req: CommandChooser,
    steerer: Steerer,
    refresher: Refresher,
    /// Activate-to-activate gate across banks.
    trrd: TxxdTimer,
    /// Four-activate window across banks.
    tfaw: TfawWindow,
    /// Column-to-column gate.
    tccd: TxxdTimer,
    /// Write-to-read turnaround gate.
    twtr: TxxdTimer,
    mode: Mode,
    /// Remaining cycles in the read-to-write bubble.
    turnaround_wait: u64,
    /// Anti-starvation countdowns for the active mode.
    read_time_left: u64,
    write_time_left: u64,
    cycle: u64,
    next_request_id: u64,
    /// Simulation statistics, updated every cycle.
    pub stats: SchedStats,
}

impl Controller {
    /// Builds a controller from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when [`Config::validate`] rejects the
    /// configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let total_banks = config.geom.total_banks() as usize;
        let banks = (0..total_banks)
            .map(|i| BankMachine::new(i as u32, config))
            .collect();
        Ok(Self {
            banks,
            choose_cmd: CommandChooser::new(total_banks),
            choose_req: CommandChooser::new(total_banks),
            steerer: Steerer::new(config),
            refresher: Refresher::new(config),
            trrd: TxxdTimer::new(config.timing.t_rrd),
            tfaw: TfawWindow::new(config.timing.t_faw),
            tccd: TxxdTimer::new(config.timing.t_ccd),
            twtr: TxxdTimer::new(config.write_to_read()),
            mode: Mode::Read,
            turnaround_wait: 0,
            read_time_left: config.controller.read_time.saturating_sub(1),
            write_time_left: config.controller.write_time.saturating_sub(1),
            cycle: 0,
            next_request_id: 0,
            stats: SchedStats::default(),
            config: config.clone(),
        })
    }

    /// Enqueues a request on its target bank.
    ///
    /// # Errors
    ///
    /// [`SubmitError::BankOutOfRange`] for a bank outside the geometry,
    /// [`SubmitError::QueueFull`] when the bank's queue is at
    /// `cmd_buffer_depth` (backpressure: retry on a later cycle).
    pub fn submit(&mut self, request: Request) -> Result<RequestId, SubmitError> {
        let nbanks = self.config.geom.total_banks();
        if request.bank >= nbanks {
            return Err(SubmitError::BankOutOfRange {
                bank: request.bank,
                nbanks,
            });
        }
        let id = RequestId(self.next_request_id);
        self.banks[request.bank as usize].enqueue(id, request)?;
        self.next_request_id += 1;
        self.stats.requests_submitted += 1;
        Ok(id)
    }

    /// Advances the scheduler by one clock cycle.
    pub fn step(&mut self) -> CycleOutput {
        let nphases = self.config.phy.nphases as usize;
        let mut out = CycleOutput {
            cycle: self.cycle,
            commands: Vec::new(),
            phases: Vec::new(),
            completed: Vec::new(),
        };

        // Timing trackers tick first: a counter reaching zero this cycle
        // already permits a command this cycle.
        self.trrd.tick();
        self.tfaw.tick();
        self.tccd.tick();
        self.twtr.tick();
        for bank in &mut self.banks {
            bank.tick_timers();
        }

        // Refresh sequencer, granted while the FSM sits in refresh mode.
        let refresh = self.refresher.step(self.mode == Mode::Refresh);
        let refresh_req = refresh.request;

        // Bank proposals from post-tick state.
        let mut candidates: Vec<Option<Command>> = Vec::with_capacity(self.banks.len());
        let mut all_granted = true;
        for bank in &self.banks {
            let bank_out = bank.outputs(refresh_req);
            all_granted &= bank_out.refresh_gnt;
            candidates.push(bank_out.cmd);
        }
        // Refresh rendezvous: every bank must have parked before the
        // sequence may start.
        let go_to_refresh = refresh_req && all_granted;

        let read_available = Self::available(&candidates, CommandKind::Read);
        let write_available = Self::available(&candidates, CommandKind::Write);

        let ras_allowed = self.trrd.ready() && self.tfaw.ready();
        let cas_allowed = self.tccd.ready();

        let mut cmd_grant = None;
        let mut req_grant = None;
        let mut sel = vec![SteerSel::Nop; nphases];
        let mut next_mode = self.mode;

        match self.mode {
            Mode::Read | Mode::Write => {
                let reading = self.mode == Mode::Read;
                let time_expired = self.run_anti_starvation(reading);

                // Plain bank commands: activates are filtered out entirely
                // while tRRD/tFAW gate them, so a grant is an acceptance.
                cmd_grant = self
                    .choose_cmd
                    .choose(&candidates, WantFlags::cmds(ras_allowed));
                if let Some(index) = cmd_grant {
                    self.choose_cmd.advance(index);
                }

                // Data commands: the grant is accepted only when the
                // column-to-column gate is clear.
                if let Some(index) = self.choose_req.choose(&candidates, WantFlags::data(reading)) {
                    if cas_allowed {
                        req_grant = Some(index);
                        self.choose_req.advance(index);
                    }
                }

                // Steering: command phase first so the data phase wins the
                // slot when both map to the same phase (nphases == 1).
                let (data_phase, cmd_phase) = if reading {
                    (self.config.phy.rdphase, self.config.phy.rdcmdphase)
                } else {
                    (self.config.phy.wrphase, self.config.phy.wrcmdphase)
                };
                sel[cmd_phase as usize] = SteerSel::Cmd;
                sel[data_phase as usize] = SteerSel::Req;

                if go_to_refresh {
                    next_mode = Mode::Refresh;
                } else if reading && write_available && (!read_available || time_expired) {
                    next_mode = self.enter_rtw();
                } else if !reading && read_available && (!write_available || time_expired) {
                    next_mode = Mode::Wtr;
                }
            }
            Mode::Rtw => {
                self.reload_anti_starvation();
                if self.turnaround_wait <= 1 {
                    next_mode = Mode::Write;
                } else {
                    self.turnaround_wait -= 1;
                }
            }
            Mode::Wtr => {
                self.reload_anti_starvation();
                if self.twtr.ready() {
                    next_mode = Mode::Read;
                }
            }
            Mode::Refresh => {
                self.reload_anti_starvation();
                sel[0] = SteerSel::Refresh;
                if refresh.done {
                    next_mode = Mode::Read;
                }
            }
        }

        // Arm the cross-bank trackers from this cycle's acceptances.
        if let Some(index) = cmd_grant {
            if let Some(cmd) = candidates[index] {
                match cmd.kind {
                    CommandKind::Activate => {
                        debug_assert!(ras_allowed, "activate accepted against tRRD/tFAW");
                        self.trrd.start();
                        self.tfaw.record();
                        self.stats.activates += 1;
                    }
                    CommandKind::Precharge => self.stats.precharges += 1,
                    _ => {}
                }
                out.commands.push(cmd);
            }
        }
        if let Some(index) = req_grant {
            if let Some(cmd) = candidates[index] {
                debug_assert!(cas_allowed, "column command accepted against tCCD");
                self.tccd.start();
                if cmd.kind == CommandKind::Write {
                    self.twtr.start();
                }
                out.commands.push(cmd);
            }
        }
        if let Some(cmd) = refresh.cmd {
            if cmd.kind == CommandKind::Refresh {
                self.stats.refreshes += 1;
            }
            out.commands.push(cmd);
        }

        // Bank commits: registered state for the next cycle.
        for (index, bank) in self.banks.iter_mut().enumerate() {
            let accepted = cmd_grant == Some(index) || req_grant == Some(index);
            let events = bank.commit(refresh_req, accepted);
            if let Some((id, is_write)) = events.completed {
                out.completed.push(id);
                if is_write {
                    self.stats.writes_completed += 1;
                } else {
                    self.stats.reads_completed += 1;
                }
            }
            self.stats.row_hits += u64::from(events.row_hit);
            self.stats.row_misses += u64::from(events.row_miss);
            self.stats.auto_precharges += u64::from(events.auto_precharged);
        }

        out.phases = self.steerer.steer(
            &sel,
            cmd_grant.and_then(|i| candidates[i].as_ref()),
            req_grant.and_then(|i| candidates[i].as_ref()),
            refresh.cmd.as_ref(),
        );

        self.stats.cycles += 1;
        self.stats.bubble_cycles += u64::from(out.is_bubble());
        if next_mode != self.mode {
            match next_mode {
                Mode::Rtw | Mode::Write if self.mode == Mode::Read => {
                    self.stats.read_to_write_switches += 1;
                }
                Mode::Wtr => self.stats.write_to_read_switches += 1,
                _ => {}
            }
        }
        self.mode = next_mode;
        self.cycle += 1;
        out
    }

    /// Current controller mode (registered; visible to the next cycle).
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current cycle index (number of completed steps).
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Immutable view of one bank machine, for inspection.
    pub fn bank(&self, index: usize) -> &BankMachine {
        &self.banks[index]
    }

    /// `true` when every bank queue is empty.
    pub fn is_idle(&self) -> bool {
        self.banks.iter().all(|b| b.queue_len() == 0)
    }

    fn available(candidates: &[Option<Command>], kind: CommandKind) -> bool {
        candidates
            .iter()
            .flatten()
            .any(|cmd| cmd.kind == kind)
    }

    /// Read-to-write bubble entry: a fixed delay covering the read latency,
    /// with `read_latency <= 1` skipping the bubble state entirely.
    fn enter_rtw(&mut self) -> Mode {
        let latency = self.config.phy.read_latency;
        if latency <= 1 {
            Mode::Write
        } else {
            self.turnaround_wait = latency - 1;
            Mode::Rtw
        }
    }

    /// Both countdowns reload while neither traffic mode is active.
    fn reload_anti_starvation(&mut self) {
        self.read_time_left = self.config.controller.read_time.saturating_sub(1);
        self.write_time_left = self.config.controller.write_time.saturating_sub(1);
    }

    /// Anti-starvation countdown for the active mode; returns `true` once
    /// the budget is spent. The inactive mode's countdown reloads, and a
    /// budget of zero disables the limit.
    fn run_anti_starvation(&mut self, reading: bool) -> bool {
        let (budget, active, inactive_budget, inactive) = if reading {
            (
                self.config.controller.read_time,
                &mut self.read_time_left,
                self.config.controller.write_time,
                &mut self.write_time_left,
            )
        } else {
            (
                self.config.controller.write_time,
                &mut self.write_time_left,
                self.config.controller.read_time,
                &mut self.read_time_left,
            )
        };
        *inactive = inactive_budget.saturating_sub(1);
        if budget == 0 {
            return false;
        }
        let expired = *active == 0;
        if !expired {
            *active -= 1;
        }
        expired
    }
}
