//! Round-robin command chooser.
//!
//! Each cycle the controller runs two chooser instances over the same set
//! of bank candidates: one selecting plain bank commands (activate and
//! precharge), one selecting data commands (read or write depending on the
//! controller mode). Each keeps its own rotating pointer, advanced only
//! when its selection was actually accepted, so a bank whose command is
//! rejected keeps its turn and idle cycles do not spin the pointer.

use crate::common::{Command, CommandKind};

/// Command classes a chooser is willing to grant this cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct WantFlags {
    /// Grant plain bank commands (activate/precharge).
    pub cmds: bool,
    /// Additionally allow ACTIVATE (the tRRD/tFAW gate); precharges are
    /// never blocked by it.
    pub activates: bool,
    /// Grant READ column commands.
    pub reads: bool,
    /// Grant WRITE column commands.
    pub writes: bool,
}

impl WantFlags {
    /// Wants plain bank commands, with activates gated by `activates`.
    pub fn cmds(activates: bool) -> Self {
        Self {
            cmds: true,
            activates,
            ..Self::default()
        }
    }

    /// Wants data commands of one direction.
    pub fn data(reads: bool) -> Self {
        Self {
            reads,
            writes: !reads,
            ..Self::default()
        }
    }
}

/// Round-robin arbiter over per-bank candidate commands.
pub struct CommandChooser {
    pointer: usize,
    n: usize,
}

impl CommandChooser {
    /// Creates a chooser over `n` banks.
    pub fn new(n: usize) -> Self {
        Self { pointer: 0, n }
    }

    /// Selects the winning bank among this cycle's qualifying candidates.
    ///
    /// Scans from the rotating pointer in bank order and returns the index
    /// of the first qualifying candidate, or `None` when nothing qualifies.
    /// Selection does not move the pointer; call [`advance`](Self::advance)
    /// once the command is accepted.
    pub fn choose(&self, candidates: &[Option<Command>], want: WantFlags) -> Option<usize> {
        for offset in 0..self.n {
            let index = (self.pointer + offset) % self.n;
            if let Some(cmd) = &candidates[index] {
                if Self::qualifies(cmd, want) {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Moves the pointer past `granted`. Called only on accepted grants.
    pub fn advance(&mut self, granted: usize) {
        self.pointer = (granted + 1) % self.n;
    }

    fn qualifies(cmd: &Command, want: WantFlags) -> bool {
        match cmd.kind {
            CommandKind::Activate => want.cmds && want.activates,
            CommandKind::Precharge => want.cmds,
            CommandKind::Read => want.reads,
            CommandKind::Write => want.writes,
            CommandKind::Refresh | CommandKind::Nop => false,
        }
    }
}
