//! Timing constraint trackers.
//!
//! Every DRAM timing rule in the scheduler reduces to one of two shapes: a
//! minimum interval between two events (tracked by [`TxxdTimer`]) or a cap
//! on events inside a sliding window (tracked by [`TfawWindow`]). Trackers
//! are ticked once per cycle before any command is proposed, so a counter
//! reaching zero this cycle already permits a command this cycle.

/// Countdown tracker for a minimum-interval constraint (tRC, tRAS, tWTR...).
///
/// `start()` is called when the tracked event occurs; `ready()` holds once
/// the interval has elapsed. Re-arming while counting resets to the new
/// interval (last-write-wins, matching a register-based countdown that is
/// reloaded on its triggering condition). An interval of zero makes the
/// tracker permanently ready.
#[derive(Clone, Copy, Debug)]
pub struct TxxdTimer {
    interval: u64,
    remaining: u64,
}

impl TxxdTimer {
    /// Creates a tracker enforcing `interval` cycles between events.
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            remaining: 0,
        }
    }

    /// Re-arms the countdown; called when the tracked event is accepted.
    pub fn start(&mut self) {
        self.remaining = self.interval;
    }

    /// Decrements the countdown. Called once per cycle, unconditionally.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// `true` when no constraint is outstanding.
    pub fn ready(&self) -> bool {
        self.remaining == 0
    }
}

/// Sliding-window tracker for the four-activate window (tFAW).
///
/// Keeps one bit per cycle of history over the last `tfaw` cycles; an
/// activate may issue only while fewer than four activates sit in the
/// window. A window of zero disables the constraint.
#[derive(Clone, Copy, Debug)]
pub struct TfawWindow {
    tfaw: u32,
    window: u64,
}

impl TfawWindow {
    /// Creates a tracker over a `tfaw`-cycle window (max 63, 0 = disabled).
    pub fn new(tfaw: u64) -> Self {
        debug_assert!(tfaw < 64, "tFAW window wider than the shift register");
        Self {
            tfaw: tfaw as u32,
            window: 0,
        }
    }

    /// Shifts the window by one cycle. Called once per cycle.
    pub fn tick(&mut self) {
        if self.tfaw > 0 {
            self.window = (self.window << 1) & ((1 << self.tfaw) - 1);
        }
    }

    /// Records an activate accepted this cycle.
    pub fn record(&mut self) {
        if self.tfaw > 0 {
            self.window |= 1;
        }
    }

    /// `true` while a fourth activate would still fit in the window.
    pub fn ready(&self) -> bool {
        self.tfaw == 0 || self.window.count_ones() < 4
    }
}
