//! ALU arithmetic operations.
//!
//! Implements wrapping addition, subtraction, multiplication and division on
//! 32-bit signed words, plus the register-immediate forms and `MOVC`.

use crate::common::FaultKind;
use crate::isa::Opcode;

/// Executes an integer arithmetic operation.
///
/// # Arguments
///
/// * `op` - The opcode to perform (must be an arithmetic variant).
/// * `a`  - First operand.
/// * `b`  - Second operand or immediate.
///
/// # Returns
///
/// The wrapped 32-bit result. Returns `0` for non-arithmetic opcodes.
///
/// # Errors
///
/// [`FaultKind::DivideByZero`] when `op` is `DIV` and `b` is zero.
pub fn execute(op: Opcode, a: i32, b: i32) -> Result<i32, FaultKind> {
    let value = match op {
        Opcode::Add | Opcode::Addl => a.wrapping_add(b),
        Opcode::Sub | Opcode::Subl => a.wrapping_sub(b),
        Opcode::Mul => a.wrapping_mul(b),
        Opcode::Div => {
            if b == 0 {
                return Err(FaultKind::DivideByZero);
            }
            // i32::MIN / -1 wraps to i32::MIN.
            a.wrapping_div(b)
        }
        Opcode::Movc => b,
        _ => 0,
    };
    Ok(value)
}
