//! Architectural Register File.
//!
//! This module provides the `RegisterFile` struct holding the sixteen APEX
//! general-purpose registers, and `RegisterView`, a read-only window pairing
//! each register value with its scoreboard validity for reporting.

use super::constants::REG_FILE_SIZE;
use crate::core::pipeline::scoreboard::Scoreboard;

/// The sixteen signed 32-bit general-purpose registers.
///
/// Only the writeback stage mutates the register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i32; REG_FILE_SIZE],
}

impl RegisterFile {
    /// Creates a register file with every register set to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; REG_FILE_SIZE],
        }
    }

    /// Reads a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15). Out-of-range indices read as zero.
    ///
    /// # Returns
    ///
    /// The 32-bit value stored in the register.
    pub fn read(&self, idx: usize) -> i32 {
        self.regs.get(idx).copied().unwrap_or(0)
    }

    /// Writes a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-15). Out-of-range writes are ignored.
    /// * `val` - The value to write.
    pub fn write(&mut self, idx: usize, val: i32) {
        if let Some(slot) = self.regs.get_mut(idx) {
            *slot = val;
        }
    }

    /// Returns all register values in index order.
    pub const fn as_array(&self) -> &[i32; REG_FILE_SIZE] {
        &self.regs
    }
}

/// Read-only view of the register file together with scoreboard validity.
///
/// A register is *valid* when no in-flight instruction will still write it.
#[derive(Clone, Copy, Debug)]
pub struct RegisterView<'a> {
    regs: &'a RegisterFile,
    scoreboard: &'a Scoreboard,
}

impl<'a> RegisterView<'a> {
    /// Pairs a register file with the scoreboard that tracks it.
    pub const fn new(regs: &'a RegisterFile, scoreboard: &'a Scoreboard) -> Self {
        Self { regs, scoreboard }
    }

    /// Value of register `idx`.
    pub fn value(&self, idx: usize) -> i32 {
        self.regs.read(idx)
    }

    /// Whether register `idx` holds its final value (no pending writer).
    pub fn is_valid(&self, idx: usize) -> bool {
        !self.scoreboard.is_pending(idx)
    }

    /// Number of registers in the view.
    pub const fn len(&self) -> usize {
        REG_FILE_SIZE
    }

    /// Always `false`; the register file has a fixed, non-zero size.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates `(index, value, valid)` for every register.
    pub fn iter(&self) -> impl Iterator<Item = (usize, i32, bool)> + use<'a> {
        let regs = self.regs;
        let scoreboard = self.scoreboard;
        (0..REG_FILE_SIZE).map(move |i| (i, regs.read(i), !scoreboard.is_pending(i)))
    }
}
