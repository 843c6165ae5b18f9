//! Data Hazard Detection.
//!
//! The pipeline has no forwarding paths: an instruction reads its operands
//! from the register file at dispatch, so it may only leave decode once no
//! in-flight instruction will still write any register it names. This module
//! provides:
//! 1. **Operand Check:** Read-after-write on any source register.
//! 2. **Destination Check:** Write-after-write on the destination register, which keeps
//!    the scoreboard at one outstanding writer per register.
//! 3. **Flag Check:** A branch reads the zero flag, so it waits for every older
//!    flag writer to execute.

use std::fmt;

use crate::core::pipeline::scoreboard::Scoreboard;
use crate::isa::Instruction;

/// Why decode must hold an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataHazard {
    /// A source register has a pending writer (read-after-write).
    Source(usize),
    /// The destination register has a pending writer (write-after-write).
    Destination(usize),
    /// A branch waits for an older instruction to write the zero flag.
    ZeroFlag,
}

impl DataHazard {
    /// The register causing the hazard, or `None` for the zero flag.
    pub const fn register(self) -> Option<usize> {
        match self {
            Self::Source(r) | Self::Destination(r) => Some(r),
            Self::ZeroFlag => None,
        }
    }
}

impl fmt::Display for DataHazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(r) => write!(f, "RAW on R{r}"),
            Self::Destination(r) => write!(f, "WAW on R{r}"),
            Self::ZeroFlag => f.write_str("zero flag pending"),
        }
    }
}

/// Checks whether `inst` can read its operands and claim its destination.
///
/// # Arguments
///
/// * `inst` - The instruction sitting in decode.
/// * `scoreboard` - Current pending-write state.
///
/// # Returns
///
/// The first hazard found, sources checked in operand order before the
/// destination and the zero flag last, or `None` when the instruction may
/// dispatch.
///
/// # Examples
///
/// ```
/// use apexsim_core::core::pipeline::hazards::{detect, DataHazard};
/// use apexsim_core::core::pipeline::scoreboard::Scoreboard;
/// use apexsim_core::isa::{Instruction, Opcode};
///
/// let mut sb = Scoreboard::new();
/// sb.mark_pending(1);
///
/// // ADD R2,R1,R1 reads R1 while MOVC R1 is still in flight.
/// let add = Instruction::reg_reg_reg(Opcode::Add, 2, 1, 1);
/// assert_eq!(detect(&add, &sb), Some(DataHazard::Source(1)));
///
/// // MOVC R1,#3 would be a second writer of R1.
/// assert_eq!(detect(&Instruction::movc(1, 3), &sb), Some(DataHazard::Destination(1)));
/// ```
pub fn detect(inst: &Instruction, scoreboard: &Scoreboard) -> Option<DataHazard> {
    if let Some(r) = scoreboard.first_pending(inst.sources()) {
        return Some(DataHazard::Source(r));
    }
    if let Some(rd) = inst.dest().filter(|&rd| scoreboard.is_pending(rd)) {
        return Some(DataHazard::Destination(rd));
    }
    (inst.opcode.is_branch() && scoreboard.zero_pending()).then_some(DataHazard::ZeroFlag)
}
