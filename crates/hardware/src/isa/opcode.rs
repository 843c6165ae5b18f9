//! APEX opcodes and their static properties.
//!
//! Every property the pipeline needs about an opcode is answered here:
//! 1. **Format:** which operand fields the instruction uses.
//! 2. **Dispatch:** which functional-unit lane executes it.
//! 3. **Effects:** whether it writes a register, touches memory, or sets the zero flag.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Operand layout of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// `rd, rs1, rs2`
    RegRegReg,
    /// `rd, rs1, #imm`
    RegRegImm,
    /// `rd, #imm`
    RegImm,
    /// `rs1, rs2, #imm` (value in `rs1`, base in `rs2`)
    StoreImm,
    /// `rs1, rs2, rs3` (value in `rs1`, address `rs2 + rs3`)
    StoreReg,
    /// `rs1, rs2`
    Compare,
    /// `#imm`
    Branch,
    /// No operands.
    Bare,
}

impl Format {
    /// Number of source registers the format reads.
    pub const fn source_count(self) -> usize {
        match self {
            Self::RegRegImm => 1,
            Self::RegRegReg | Self::StoreImm | Self::Compare => 2,
            Self::StoreReg => 3,
            Self::RegImm | Self::Branch | Self::Bare => 0,
        }
    }

    /// Whether the format names a destination register.
    pub const fn has_destination(self) -> bool {
        matches!(self, Self::RegRegReg | Self::RegRegImm | Self::RegImm)
    }
}

/// Functional-unit lane an opcode is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitClass {
    /// Integer ALU: arithmetic, logic, compare, branches, moves, NOP, HALT.
    Integer,
    /// Multiplier.
    Multiply,
    /// Load/store address unit.
    LoadStore,
}

/// Coarse category used for the instruction-mix statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpClass {
    /// Integer arithmetic, logic and moves.
    Alu,
    /// Multiplication.
    Mul,
    /// Memory reads.
    Load,
    /// Memory writes.
    Store,
    /// Conditional branches.
    Branch,
    /// Compare.
    Compare,
    /// `NOP` and `HALT`.
    Other,
}

/// An APEX opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `rd = rs1 + rs2`
    Add,
    /// `rd = rs1 - rs2`
    Sub,
    /// `rd = rs1 * rs2`
    Mul,
    /// `rd = rs1 / rs2`
    Div,
    /// `rd = rs1 & rs2`
    And,
    /// `rd = rs1 | rs2`
    Or,
    /// `rd = rs1 ^ rs2`
    Xor,
    /// `rd = rs1 + imm`
    Addl,
    /// `rd = rs1 - imm`
    Subl,
    /// `rd = imm`
    Movc,
    /// `rd = mem[rs1 + imm]`
    Load,
    /// `mem[rs2 + imm] = rs1`
    Store,
    /// `rd = mem[rs1 + rs2]`
    Ldr,
    /// `mem[rs2 + rs3] = rs1`
    Str,
    /// `Z = (rs1 == rs2)`
    Cmp,
    /// Branch to `pc + imm` when the zero flag is set.
    Bz,
    /// Branch to `pc + imm` when the zero flag is clear.
    Bnz,
    /// No operation.
    Nop,
    /// Stop the simulation once retired.
    Halt,
}

impl Opcode {
    /// Every opcode, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Addl,
        Self::Subl,
        Self::Movc,
        Self::Load,
        Self::Store,
        Self::Ldr,
        Self::Str,
        Self::Cmp,
        Self::Bz,
        Self::Bnz,
        Self::Nop,
        Self::Halt,
    ];

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Addl => "ADDL",
            Self::Subl => "SUBL",
            Self::Movc => "MOVC",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Ldr => "LDR",
            Self::Str => "STR",
            Self::Cmp => "CMP",
            Self::Bz => "BZ",
            Self::Bnz => "BNZ",
            Self::Nop => "NOP",
            Self::Halt => "HALT",
        }
    }

    /// Operand layout.
    pub const fn format(self) -> Format {
        match self {
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::And
            | Self::Or
            | Self::Xor
            | Self::Ldr => Format::RegRegReg,
            Self::Addl | Self::Subl | Self::Load => Format::RegRegImm,
            Self::Movc => Format::RegImm,
            Self::Store => Format::StoreImm,
            Self::Str => Format::StoreReg,
            Self::Cmp => Format::Compare,
            Self::Bz | Self::Bnz => Format::Branch,
            Self::Nop | Self::Halt => Format::Bare,
        }
    }

    /// Lane the decode stage dispatches this opcode to.
    pub const fn unit(self) -> UnitClass {
        match self {
            Self::Mul => UnitClass::Multiply,
            Self::Load | Self::Store | Self::Ldr | Self::Str => UnitClass::LoadStore,
            _ => UnitClass::Integer,
        }
    }

    /// Instruction-mix category.
    pub const fn class(self) -> OpClass {
        match self {
            Self::Mul => OpClass::Mul,
            Self::Load | Self::Ldr => OpClass::Load,
            Self::Store | Self::Str => OpClass::Store,
            Self::Bz | Self::Bnz => OpClass::Branch,
            Self::Cmp => OpClass::Compare,
            Self::Nop | Self::Halt => OpClass::Other,
            _ => OpClass::Alu,
        }
    }

    /// Whether the opcode produces a register result.
    pub const fn writes_register(self) -> bool {
        self.format().has_destination()
    }

    /// Whether the opcode reads data memory.
    pub const fn is_load(self) -> bool {
        matches!(self, Self::Load | Self::Ldr)
    }

    /// Whether the opcode writes data memory.
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Store | Self::Str)
    }

    /// Whether the opcode is a conditional branch.
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Bz | Self::Bnz)
    }

    /// Whether executing the opcode updates the zero flag from its result.
    ///
    /// `CMP` also writes the flag but from an equality test, not a result.
    pub const fn sets_zero_flag(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::Mul
                | Self::Div
                | Self::And
                | Self::Or
                | Self::Xor
                | Self::Addl
                | Self::Subl
                | Self::Movc
        )
    }

    /// Whether executing the opcode writes the zero flag at all, `CMP` included.
    pub const fn writes_zero_flag(self) -> bool {
        self.sets_zero_flag() || matches!(self, Self::Cmp)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Error returned when a mnemonic is not an APEX opcode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown opcode '{0}'")]
pub struct UnknownOpcode(pub String);

impl FromStr for Opcode {
    type Err = UnknownOpcode;

    /// Parses a mnemonic, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOpcode(s.to_string()))
    }
}
