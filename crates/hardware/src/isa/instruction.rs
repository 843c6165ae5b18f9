//! The immutable instruction record.
//!
//! Records are created once by the loader, never mutated, and looked up by
//! the fetch stage from the program counter.

use super::opcode::{Format, Opcode};

/// One decoded APEX instruction.
///
/// Register fields that the opcode's [`Format`] does not use are zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Operation.
    pub opcode: Opcode,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Third source register index (`STR` only).
    pub rs3: usize,
    /// Signed immediate.
    pub imm: i32,
}

impl Instruction {
    /// Creates a record with all operand fields zeroed.
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            rd: 0,
            rs1: 0,
            rs2: 0,
            rs3: 0,
            imm: 0,
        }
    }

    /// `OP rd, rs1, rs2`
    pub const fn reg_reg_reg(opcode: Opcode, rd: usize, rs1: usize, rs2: usize) -> Self {
        Self {
            rd,
            rs1,
            rs2,
            ..Self::new(opcode)
        }
    }

    /// `OP rd, rs1, #imm`
    pub const fn reg_reg_imm(opcode: Opcode, rd: usize, rs1: usize, imm: i32) -> Self {
        Self {
            rd,
            rs1,
            imm,
            ..Self::new(opcode)
        }
    }

    /// `MOVC rd, #imm`
    pub const fn movc(rd: usize, imm: i32) -> Self {
        Self {
            rd,
            imm,
            ..Self::new(Opcode::Movc)
        }
    }

    /// `STORE rs1, rs2, #imm`
    pub const fn store(rs1: usize, rs2: usize, imm: i32) -> Self {
        Self {
            rs1,
            rs2,
            imm,
            ..Self::new(Opcode::Store)
        }
    }

    /// `STR rs1, rs2, rs3`
    pub const fn store_indexed(rs1: usize, rs2: usize, rs3: usize) -> Self {
        Self {
            rs1,
            rs2,
            rs3,
            ..Self::new(Opcode::Str)
        }
    }

    /// `CMP rs1, rs2`
    pub const fn cmp(rs1: usize, rs2: usize) -> Self {
        Self {
            rs1,
            rs2,
            ..Self::new(Opcode::Cmp)
        }
    }

    /// `BZ #imm` or `BNZ #imm`
    pub const fn branch(opcode: Opcode, imm: i32) -> Self {
        Self {
            imm,
            ..Self::new(opcode)
        }
    }

    /// Operand layout of this instruction.
    pub const fn format(&self) -> Format {
        self.opcode.format()
    }

    /// Destination register, if the opcode writes one.
    pub const fn dest(&self) -> Option<usize> {
        if self.opcode.writes_register() {
            Some(self.rd)
        } else {
            None
        }
    }

    /// Source registers the instruction reads, in operand order.
    pub fn sources(&self) -> impl Iterator<Item = usize> + use<> {
        [self.rs1, self.rs2, self.rs3]
            .into_iter()
            .take(self.opcode.format().source_count())
    }

    /// Every register the instruction names (sources, then destination).
    pub fn registers(&self) -> impl Iterator<Item = usize> + use<> {
        self.sources().chain(self.dest())
    }
}
