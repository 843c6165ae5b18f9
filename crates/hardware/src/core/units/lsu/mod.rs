//! Load/Store Unit (LSU).
//!
//! Computes and bounds-checks data-memory addresses for the four memory
//! opcodes. The read itself happens here or in the memory stage; stores are
//! committed by writeback.
//!
//! | Opcode  | Address       | Stored value |
//! |---------|---------------|--------------|
//! | `LOAD`  | `rs1 + imm`   | -            |
//! | `LDR`   | `rs1 + rs2`   | -            |
//! | `STORE` | `rs2 + imm`   | `rs1`        |
//! | `STR`   | `rs2 + rs3`   | `rs1`        |

use crate::common::FaultKind;
use crate::core::cpu::DataMemory;
use crate::core::pipeline::latches::IssueEntry;
use crate::isa::Opcode;

/// Load/Store Unit (LSU) for memory operations.
#[derive(Clone, Copy, Debug)]
pub struct Lsu;

impl Lsu {
    /// Computes the effective word address of a memory instruction.
    ///
    /// The sum is formed in 64 bits so it cannot wrap; out-of-range results
    /// are caught by [`Lsu::resolve`].
    ///
    /// # Returns
    ///
    /// `None` for opcodes that do not access memory.
    pub fn effective_address(entry: &IssueEntry) -> Option<i64> {
        let (base, offset) = match entry.inst.opcode {
            Opcode::Load => (entry.rv1, entry.inst.imm),
            Opcode::Ldr => (entry.rv1, entry.rv2),
            Opcode::Store => (entry.rv2, entry.inst.imm),
            Opcode::Str => (entry.rv2, entry.rv3),
            _ => return None,
        };
        Some(i64::from(base) + i64::from(offset))
    }

    /// Checks an address against data memory.
    ///
    /// # Errors
    ///
    /// [`FaultKind::AddressOutOfBounds`] when the address is negative or past
    /// the last word.
    pub fn resolve(memory: &DataMemory, address: i64) -> Result<usize, FaultKind> {
        memory
            .resolve(address)
            .ok_or(FaultKind::AddressOutOfBounds { address })
    }

    /// Value a store writes: the first source register.
    pub const fn store_value(entry: &IssueEntry) -> i32 {
        entry.rv1
    }
}
