//! Code memory.
//!
//! The loaded program is immutable. Instruction `i` lives at
//! `base_pc + 4 * i`; any other address fetches nothing.

use crate::common::INSTRUCTION_SIZE;
use crate::isa::Instruction;

/// The program being simulated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    base_pc: u32,
    instructions: Vec<Instruction>,
}

impl Program {
    /// Places `instructions` starting at `base_pc`.
    pub const fn new(base_pc: u32, instructions: Vec<Instruction>) -> Self {
        Self {
            base_pc,
            instructions,
        }
    }

    /// Address of the first instruction.
    pub const fn base_pc(&self) -> u32 {
        self.base_pc
    }

    /// One past the address of the last instruction.
    pub fn end_pc(&self) -> u64 {
        u64::from(self.base_pc) + self.instructions.len() as u64 * u64::from(INSTRUCTION_SIZE)
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Code-memory index for `pc`, if `pc` is aligned and at or above the base.
    fn index_of(&self, pc: u32) -> Option<usize> {
        let offset = pc.checked_sub(self.base_pc)?;
        (offset % INSTRUCTION_SIZE == 0).then_some((offset / INSTRUCTION_SIZE) as usize)
    }

    /// Instruction at `pc`, or `None` when `pc` is outside the program.
    pub fn fetch(&self, pc: u32) -> Option<Instruction> {
        self.index_of(pc)
            .and_then(|idx| self.instructions.get(idx).copied())
    }

    /// Whether a branch may redirect fetch to `target`.
    ///
    /// Valid targets are aligned instruction addresses inside the program, or
    /// exactly the end of the program (which simply exhausts fetch).
    pub fn is_branch_target(&self, target: i64) -> bool {
        u32::try_from(target)
            .ok()
            .and_then(|pc| self.index_of(pc))
            .is_some_and(|idx| idx <= self.instructions.len())
    }
}
