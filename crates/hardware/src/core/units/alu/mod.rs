//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer datapath shared by the Integer and
//! Multiply lanes. All arithmetic is wrapping two's-complement on 32-bit
//! signed words.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mul, Div, Addl, Subl, Movc
//! - [`logic`]:      And, Or, Xor, Cmp

/// Integer arithmetic operations (add, subtract, multiply, divide, move).
pub mod arithmetic;

/// Bitwise logical operations and the equality compare.
pub mod logic;

use crate::common::FaultKind;
use crate::isa::Opcode;

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Clone, Copy, Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// Dispatches to the appropriate submodule based on the opcode.
    ///
    /// # Arguments
    ///
    /// * `op` - The opcode to perform
    /// * `a`  - First operand (`rs1`, or `0` for `MOVC`)
    /// * `b`  - Second operand (`rs2` or the immediate)
    ///
    /// # Returns
    ///
    /// The 32-bit result. `CMP` yields `1` on equality and `0` otherwise;
    /// opcodes that do not use the ALU yield `0`.
    ///
    /// # Errors
    ///
    /// [`FaultKind::DivideByZero`] for `DIV` with `b == 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use apexsim_core::core::units::alu::Alu;
    /// use apexsim_core::isa::Opcode;
    ///
    /// assert_eq!(Alu::execute(Opcode::Add, 5, 10), Ok(15));
    /// assert_eq!(Alu::execute(Opcode::Subl, 3, 5), Ok(-2));
    /// assert_eq!(Alu::execute(Opcode::Mul, i32::MAX, 2), Ok(-2));
    /// assert_eq!(Alu::execute(Opcode::Xor, 0b1100, 0b1010), Ok(0b0110));
    /// assert_eq!(Alu::execute(Opcode::Cmp, 7, 7), Ok(1));
    /// assert!(Alu::execute(Opcode::Div, 7, 0).is_err());
    /// ```
    pub fn execute(op: Opcode, a: i32, b: i32) -> Result<i32, FaultKind> {
        match op {
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Addl
            | Opcode::Subl
            | Opcode::Movc => arithmetic::execute(op, a, b),

            Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Cmp => Ok(logic::execute(op, a, b)),

            // Memory and control opcodes never reach the ALU datapath.
            _ => Ok(0),
        }
    }
}
