//! Fault and error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Fault Representation:** Runtime faults raised by an executing instruction.
//! 2. **Initialization Errors:** Reasons a simulator cannot be constructed.
//! 3. **Load Errors:** Failures reading or parsing an APEX program file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::isa::Opcode;

/// The category of a runtime fault.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FaultKind {
    /// Division by zero in the integer unit.
    ///
    /// The destination register is left untouched.
    #[error("division by zero")]
    DivideByZero,

    /// A load or store computed an address outside data memory.
    ///
    /// The associated value is the word address that was computed.
    #[error("data address {address} is outside data memory")]
    AddressOutOfBounds {
        /// The offending word address.
        address: i64,
    },

    /// A taken branch computed a target outside the loaded program or not
    /// aligned to an instruction boundary.
    #[error("branch target {target} is outside the program")]
    BranchTarget {
        /// The offending target PC.
        target: i64,
    },
}

/// A runtime fault raised by one instruction.
///
/// Faults are not retried: the tick that raises one aborts, the simulator
/// enters the faulted state, and the fault is surfaced to the caller with the
/// faulting program counter and opcode.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} (pc={pc}, opcode={opcode})")]
pub struct Fault {
    /// What went wrong.
    pub kind: FaultKind,
    /// Program counter of the faulting instruction.
    pub pc: u32,
    /// Opcode of the faulting instruction.
    pub opcode: Opcode,
}

impl Fault {
    /// Creates a fault for the instruction at `pc`.
    pub const fn new(kind: FaultKind, pc: u32, opcode: Opcode) -> Self {
        Self { kind, pc, opcode }
    }
}

/// Reasons the simulator refuses to initialize.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InitError {
    /// The program contains no instructions.
    #[error("program is empty")]
    EmptyProgram,

    /// The configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors produced while reading or parsing an APEX program.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The program file could not be read.
    #[error("could not read '{}': {source}", path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A line could not be parsed as an instruction.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based source line number.
        line: usize,
        /// Human-readable description of the problem.
        message: String,
    },

    /// The source contained no instructions.
    #[error("program contains no instructions")]
    Empty,
}
