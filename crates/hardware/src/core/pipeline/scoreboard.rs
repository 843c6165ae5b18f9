//! Register scoreboard.
//!
//! Tracks, for every architectural register, whether an in-flight instruction
//! will still write it. Decode marks the destination `Pending` when it
//! dispatches a producer; writeback clears it when that producer retires.
//! Because decode refuses to dispatch while a destination is already
//! `Pending`, each register has at most one outstanding writer and a plain
//! two-state entry is enough.
//!
//! The zero flag is tracked separately. Flag writers never stall each other,
//! so the scoreboard counts the dispatched ones that have not executed yet;
//! a branch may only dispatch once that count is zero.

use crate::common::REG_FILE_SIZE;

/// Pending-write state of one register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RegState {
    /// The register file holds the current value.
    #[default]
    Clear,
    /// An issued instruction will overwrite the register.
    Pending,
}

/// One [`RegState`] per architectural register.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    regs: [RegState; REG_FILE_SIZE],
    zero_writers: u32,
}

impl Scoreboard {
    /// Create a new scoreboard with all registers clear (no pending writers).
    pub const fn new() -> Self {
        Self {
            regs: [RegState::Clear; REG_FILE_SIZE],
            zero_writers: 0,
        }
    }

    /// Mark a register as having a pending writer.
    pub fn mark_pending(&mut self, reg: usize) {
        if let Some(slot) = self.regs.get_mut(reg) {
            *slot = RegState::Pending;
        }
    }

    /// Clear a register's pending writer.
    pub fn clear(&mut self, reg: usize) {
        if let Some(slot) = self.regs.get_mut(reg) {
            *slot = RegState::Clear;
        }
    }

    /// State of `reg`; out-of-range indices read as `Clear`.
    pub fn state(&self, reg: usize) -> RegState {
        self.regs.get(reg).copied().unwrap_or_default()
    }

    /// Whether `reg` has an outstanding writer.
    pub fn is_pending(&self, reg: usize) -> bool {
        self.state(reg) == RegState::Pending
    }

    /// First register among `regs` that is pending, if any.
    pub fn first_pending(&self, regs: impl IntoIterator<Item = usize>) -> Option<usize> {
        regs.into_iter().find(|&r| self.is_pending(r))
    }

    /// Number of registers currently pending.
    pub fn pending_count(&self) -> usize {
        self.regs
            .iter()
            .filter(|&&s| s == RegState::Pending)
            .count()
    }

    /// Record a dispatched instruction that will write the zero flag.
    pub const fn mark_zero_pending(&mut self) {
        self.zero_writers += 1;
    }

    /// Record that one zero-flag writer has executed.
    pub const fn release_zero(&mut self) {
        self.zero_writers = self.zero_writers.saturating_sub(1);
    }

    /// Whether a dispatched instruction has yet to write the zero flag.
    pub const fn zero_pending(&self) -> bool {
        self.zero_writers > 0
    }
}
