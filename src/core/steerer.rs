//! Command steering onto output phases.
//!
//! One scheduling decision per cycle is spread over `nphases` DFI-like
//! phase slots: the data command goes to the read or write data phase, the
//! plain bank command to the matching command phase, and everything else is
//! NOP. The steerer also decodes chip selects: with multiple ranks the high
//! bank-address bits pick the rank, and a refresh (always steered to phase
//! 0) selects every rank at once.

use crate::common::{ChipSelect, Command, CommandKind, PhaseCommand};
use crate::config::Config;

/// Source selected for one phase slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SteerSel {
    /// No command on this phase.
    Nop,
    /// The plain bank command chosen this cycle.
    Cmd,
    /// The data (column) command chosen this cycle.
    Req,
    /// The refresher's command (phase 0 only).
    Refresh,
}

/// Maps chosen commands onto per-phase outputs with rank decoding.
pub struct Steerer {
    nphases: usize,
    rankbits: u32,
    bankbits: u32,
}

impl Steerer {
    /// Builds a steerer for the configured geometry.
    pub fn new(config: &Config) -> Self {
        Self {
            nphases: config.phy.nphases as usize,
            rankbits: config.geom.rankbits(),
            bankbits: config.geom.bankbits(),
        }
    }

    /// Produces this cycle's phase commands.
    ///
    /// `sel` must have one entry per phase. Slots selecting a source that
    /// carries no command this cycle emit NOP.
    pub fn steer(
        &self,
        sel: &[SteerSel],
        cmd: Option<&Command>,
        req: Option<&Command>,
        refresh: Option<&Command>,
    ) -> Vec<PhaseCommand> {
        debug_assert_eq!(sel.len(), self.nphases);
        sel.iter()
            .map(|slot| match slot {
                SteerSel::Nop => PhaseCommand::nop(),
                SteerSel::Cmd => cmd.map_or_else(PhaseCommand::nop, |c| self.decode(c, false)),
                SteerSel::Req => req.map_or_else(PhaseCommand::nop, |c| self.decode(c, false)),
                SteerSel::Refresh => {
                    refresh.map_or_else(PhaseCommand::nop, |c| self.decode(c, true))
                }
            })
            .collect()
    }

    /// Splits the global bank index into (chip select, bank-within-rank).
    ///
    /// Refresh-path commands address all ranks, so their chip select is
    /// forced to `All` instead of a single rank's decode.
    fn decode(&self, cmd: &Command, all_ranks: bool) -> PhaseCommand {
        let cs = if all_ranks {
            ChipSelect::All
        } else if self.rankbits > 0 {
            ChipSelect::Rank(cmd.bank >> self.bankbits)
        } else {
            ChipSelect::Rank(0)
        };
        let bank = if self.rankbits > 0 {
            cmd.bank & ((1 << self.bankbits) - 1)
        } else {
            cmd.bank
        };
        debug_assert!(cmd.kind != CommandKind::Nop);
        PhaseCommand {
            kind: cmd.kind,
            cs,
            bank,
            address: cmd.address,
            auto_precharge: cmd.auto_precharge,
        }
    }
}
