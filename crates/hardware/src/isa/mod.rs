//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the APEX opcode set, the immutable instruction record produced by
//! the loader, and the textual rendering used by traces and dumps.
//!
//! # Operand shapes
//!
//! * Register-register: `ADD SUB MUL DIV AND OR XOR LDR` (`rd, rs1, rs2`).
//! * Register-immediate: `ADDL SUBL LOAD` (`rd, rs1, #imm`) and `MOVC` (`rd, #imm`).
//! * Stores: `STORE` (`rs1, rs2, #imm`) and `STR` (`rs1, rs2, rs3`).
//! * Control: `CMP` (`rs1, rs2`), `BZ BNZ` (`#imm`), `NOP`, `HALT`.

/// Instruction text rendering for traces and dumps.
pub mod disasm;

/// The immutable instruction record.
pub mod instruction;

/// Opcodes and their static classification.
pub mod opcode;

pub use instruction::Instruction;
pub use opcode::{Format, OpClass, Opcode, UnitClass};
