//! DRAM command and request types.
//!
//! This module defines the classification of DRAM commands used throughout
//! the scheduler. Commands are transient: a bank machine or the refresher
//! produces a candidate each cycle, the arbiter accepts it or not within the
//! same cycle, and a rejected candidate is simply regenerated from bank
//! state on the next cycle.

/// Bit of the address field carrying the auto-precharge flag (A10).
pub const AUTO_PRECHARGE_BIT: u32 = 10;

/// Type of DRAM command.
///
/// Used to distinguish row commands (activate/precharge), column commands
/// (read/write), and the global refresh command for arbitration, steering,
/// and timing-constraint arming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Opens (latches) a row into the bank's sense amplifiers.
    Activate,
    /// Closes the bank's open row. With A10 set, closes all banks.
    Precharge,
    /// Column read from the open row.
    Read,
    /// Column write to the open row.
    Write,
    /// Auto-refresh, issued to all banks of all ranks at once.
    Refresh,
    /// No operation (deselect).
    Nop,
}

impl CommandKind {
    /// Returns `true` for plain bank commands (row open/close).
    pub fn is_cmd(self) -> bool {
        matches!(self, Self::Activate | Self::Precharge)
    }

    /// Returns `true` for data-phase column commands.
    pub fn is_data(self) -> bool {
        matches!(self, Self::Read | Self::Write)
    }
}

/// A candidate DRAM command for one cycle.
///
/// `bank` is the global bank index: when multiple ranks are configured, the
/// low bits address the bank within its rank and the high bits select the
/// rank (decoded by the steerer). `address` carries the row for ACTIVATE and
/// the column for READ/WRITE; column addresses encode auto-precharge in bit
/// A10, mirrored by the `auto_precharge` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command {
    /// Global bank index (rank bits in the high part).
    pub bank: u32,
    /// Row or column address depending on `kind`.
    pub address: u32,
    /// Command type.
    pub kind: CommandKind,
    /// Whether a READ/WRITE closes the row after the burst.
    pub auto_precharge: bool,
}

impl Command {
    /// Builds an ACTIVATE command for `row` on `bank`.
    pub fn activate(bank: u32, row: u32) -> Self {
        Self {
            bank,
            address: row,
            kind: CommandKind::Activate,
            auto_precharge: false,
        }
    }

    /// Builds a PRECHARGE command for `bank` (A10 low: single bank).
    pub fn precharge(bank: u32) -> Self {
        Self {
            bank,
            address: 0,
            kind: CommandKind::Precharge,
            auto_precharge: false,
        }
    }

    /// Builds a PRECHARGE-ALL command (A10 high).
    pub fn precharge_all() -> Self {
        Self {
            bank: 0,
            address: 1 << AUTO_PRECHARGE_BIT,
            kind: CommandKind::Precharge,
            auto_precharge: false,
        }
    }

    /// Builds an AUTO-REFRESH command.
    pub fn refresh() -> Self {
        Self {
            bank: 0,
            address: 0,
            kind: CommandKind::Refresh,
            auto_precharge: false,
        }
    }

    /// Builds a column READ/WRITE command.
    pub fn column(bank: u32, col: u32, is_write: bool, auto_precharge: bool) -> Self {
        let ap = u32::from(auto_precharge) << AUTO_PRECHARGE_BIT;
        Self {
            bank,
            address: col | ap,
            kind: if is_write {
                CommandKind::Write
            } else {
                CommandKind::Read
            },
            auto_precharge,
        }
    }
}

/// A memory access request as seen by the scheduler.
///
/// Requests are immutable once submitted. Each is queued on the bank machine
/// matching its `bank` field and destroyed when its data phase is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request {
    /// Global bank index (rank bits in the high part).
    pub bank: u32,
    /// Row address within the bank.
    pub row: u32,
    /// Column address within the row.
    pub col: u32,
    /// `true` for writes, `false` for reads.
    pub is_write: bool,
}

/// Handle correlating a submitted request with its completion.
///
/// Assigned monotonically by [`Controller::submit`]; reported back in
/// [`CycleOutput::completed`] once the request's data phase is accepted.
///
/// [`Controller::submit`]: crate::core::Controller::submit
/// [`CycleOutput::completed`]: crate::core::CycleOutput
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Chip-select decode for one command phase.
///
/// Hardware drives an active-low one-hot `cs_n` vector over the ranks; this
/// model keeps the decoded meaning instead of the wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChipSelect {
    /// No rank selected (NOP/deselect phase).
    Idle,
    /// A single rank selected.
    Rank(u32),
    /// All ranks selected (refresh and precharge-all).
    All,
}

/// The command presented on one output phase of one cycle.
///
/// This is the DFI-like view the steerer produces: `bank` here is the
/// bank-within-rank address (rank bits already decoded into `cs`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseCommand {
    /// Command type (NOP for unused phases).
    pub kind: CommandKind,
    /// Decoded chip select.
    pub cs: ChipSelect,
    /// Bank address within the selected rank.
    pub bank: u32,
    /// Row or column address.
    pub address: u32,
    /// Auto-precharge flag for column commands.
    pub auto_precharge: bool,
}

impl PhaseCommand {
    /// Returns the NOP phase command.
    pub fn nop() -> Self {
        Self {
            kind: CommandKind::Nop,
            cs: ChipSelect::Idle,
            bank: 0,
            address: 0,
            auto_precharge: false,
        }
    }

    /// Returns `true` if this phase carries no command.
    pub fn is_nop(&self) -> bool {
        self.kind == CommandKind::Nop
    }
}
