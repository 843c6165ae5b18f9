//! Branch Resolution Unit (BRU).
//!
//! Branches are resolved in the Integer lane against the CPU-wide zero flag.
//! There is no prediction: fetch simply continues down the fall-through path
//! and a taken branch redirects it.

use crate::core::cpu::Program;
use crate::isa::Opcode;

/// Branch resolution for `BZ` and `BNZ`.
#[derive(Clone, Copy, Debug)]
pub struct Bru;

impl Bru {
    /// Whether a branch is taken given the current zero flag.
    ///
    /// Non-branch opcodes are never taken.
    pub const fn taken(op: Opcode, zero_flag: bool) -> bool {
        match op {
            Opcode::Bz => zero_flag,
            Opcode::Bnz => !zero_flag,
            _ => false,
        }
    }

    /// PC-relative target of a branch at `pc`.
    pub fn target(pc: u32, imm: i32) -> i64 {
        i64::from(pc) + i64::from(imm)
    }

    /// Resolves a taken branch to a fetch address.
    ///
    /// # Returns
    ///
    /// The new PC when `target` is an aligned address inside the program (or
    /// exactly its end), otherwise `None`.
    pub fn redirect(program: &Program, target: i64) -> Option<u32> {
        if program.is_branch_target(target) {
            u32::try_from(target).ok()
        } else {
            None
        }
    }
}
