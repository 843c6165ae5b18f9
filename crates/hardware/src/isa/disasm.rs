//! Instruction text rendering.
//!
//! Renders an [`Instruction`] in the comma-separated APEX assembly form the
//! loader accepts (`ADD,R3,R1,R2`, `MOVC,R1,#5`, `BZ,#8`), for stage traces,
//! the code-memory listing, and test diagnostics.

use std::fmt;

use super::instruction::Instruction;
use super::opcode::Format;

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode.mnemonic();
        match self.format() {
            Format::RegRegReg => write!(f, "{op},R{},R{},R{}", self.rd, self.rs1, self.rs2),
            Format::RegRegImm => write!(f, "{op},R{},R{},#{}", self.rd, self.rs1, self.imm),
            Format::RegImm => write!(f, "{op},R{},#{}", self.rd, self.imm),
            Format::StoreImm => write!(f, "{op},R{},R{},#{}", self.rs1, self.rs2, self.imm),
            Format::StoreReg => write!(f, "{op},R{},R{},R{}", self.rs1, self.rs2, self.rs3),
            Format::Compare => write!(f, "{op},R{},R{}", self.rs1, self.rs2),
            Format::Branch => write!(f, "{op},#{}", self.imm),
            Format::Bare => f.write_str(op),
        }
    }
}

/// Renders a program as an indexed listing, one instruction per line.
///
/// # Arguments
///
/// * `base_pc` - Address of the first instruction.
/// * `program` - Instructions in program order.
///
/// # Returns
///
/// Lines of the form `pc(4000)  MOVC,R1,#5`.
pub fn listing(base_pc: u32, program: &[Instruction]) -> Vec<String> {
    program
        .iter()
        .zip((base_pc..).step_by(crate::common::INSTRUCTION_SIZE as usize))
        .map(|(inst, pc)| format!("pc({pc})  {inst}"))
        .collect()
}
