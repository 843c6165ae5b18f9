//! ALU logical and comparison operations.
//!
//! Implements bitwise AND, OR, XOR and the `CMP` equality test. The compare
//! result is `1` or `0`; the execute stage turns it into the zero flag.

use crate::isa::Opcode;

/// Executes a logical or comparison operation.
///
/// # Arguments
///
/// * `op` - The opcode to perform (must be a logic/compare variant).
/// * `a`  - First operand.
/// * `b`  - Second operand.
///
/// # Returns
///
/// The 32-bit result. Returns `0` for non-logic opcodes.
pub fn execute(op: Opcode, a: i32, b: i32) -> i32 {
    match op {
        Opcode::And => a & b,
        Opcode::Or => a | b,
        Opcode::Xor => a ^ b,
        Opcode::Cmp => i32::from(a == b),
        _ => 0,
    }
}
