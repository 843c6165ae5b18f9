//! APEX Program Loader.
//!
//! This module turns APEX assembly text into instruction records. It performs:
//! 1. **Reading:** Loads a program file from disk.
//! 2. **Tokenizing:** Splits each line on commas and whitespace, dropping `;` and `//` comments.
//! 3. **Parsing:** Checks each operand against the opcode's layout and builds an [`Instruction`].
//!
//! ```text
//! MOVC,R1,#5        ; comma separated
//! MOVC R2, #10      // or whitespace separated
//! ADD R3,R1,R2
//! HALT
//! ```

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::{LoadError, REG_FILE_SIZE};
use crate::isa::{Format, Instruction, Opcode};

/// Reads and parses an APEX program file.
///
/// # Arguments
///
/// * `path` - Path to the assembly source.
///
/// # Errors
///
/// [`LoadError::Io`] if the file cannot be read, otherwise any error from
/// [`parse_program`].
pub fn load_program(path: impl AsRef<Path>) -> Result<Vec<Instruction>, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let program = parse_program(&text)?;
    debug!(path = %path.display(), instructions = program.len(), "program loaded");
    Ok(program)
}

/// Parses APEX assembly text.
///
/// # Returns
///
/// The instructions in source order.
///
/// # Errors
///
/// [`LoadError::Parse`] with the 1-based line number of the first malformed
/// line, or [`LoadError::Empty`] when the text contains no instructions.
///
/// # Examples
///
/// ```
/// use apexsim_core::sim::loader::parse_program;
/// use apexsim_core::isa::{Instruction, Opcode};
///
/// let program = parse_program("movc R1,#5\nADD,R3,R1,R1 ; double it\nHALT").unwrap();
/// assert_eq!(program[0], Instruction::movc(1, 5));
/// assert_eq!(program[1], Instruction::reg_reg_reg(Opcode::Add, 3, 1, 1));
/// assert_eq!(program.len(), 3);
/// ```
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, LoadError> {
    let mut program = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = strip_comment(raw);
        let tokens: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        let Some((mnemonic, operands)) = tokens.split_first() else {
            continue;
        };
        let inst = parse_instruction(mnemonic, operands).map_err(|message| LoadError::Parse {
            line: idx + 1,
            message,
        })?;
        program.push(inst);
    }
    if program.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(program)
}

/// Removes a trailing `;` or `//` comment.
fn strip_comment(line: &str) -> &str {
    let end = [line.find(';'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

/// Builds one instruction from its mnemonic and operand tokens.
fn parse_instruction(mnemonic: &str, operands: &[&str]) -> Result<Instruction, String> {
    let opcode = mnemonic.parse::<Opcode>().map_err(|e| e.to_string())?;
    let shape: &[Operand] = match opcode.format() {
        Format::RegRegReg | Format::StoreReg => &[Operand::Reg, Operand::Reg, Operand::Reg],
        Format::RegRegImm | Format::StoreImm => &[Operand::Reg, Operand::Reg, Operand::Imm],
        Format::RegImm => &[Operand::Reg, Operand::Imm],
        Format::Compare => &[Operand::Reg, Operand::Reg],
        Format::Branch => &[Operand::Imm],
        Format::Bare => &[],
    };
    if operands.len() != shape.len() {
        return Err(format!(
            "{opcode} expects {} operand(s), found {}",
            shape.len(),
            operands.len()
        ));
    }

    let mut regs = Vec::with_capacity(3);
    let mut imm = 0;
    for (token, kind) in operands.iter().zip(shape) {
        match kind {
            Operand::Reg => regs.push(parse_register(token)?),
            Operand::Imm => imm = parse_immediate(token)?,
        }
    }
    let reg = |i: usize| regs.get(i).copied().unwrap_or_default();

    Ok(match opcode.format() {
        Format::RegRegReg => Instruction::reg_reg_reg(opcode, reg(0), reg(1), reg(2)),
        Format::RegRegImm => Instruction::reg_reg_imm(opcode, reg(0), reg(1), imm),
        Format::RegImm => Instruction::movc(reg(0), imm),
        Format::StoreImm => Instruction::store(reg(0), reg(1), imm),
        Format::StoreReg => Instruction::store_indexed(reg(0), reg(1), reg(2)),
        Format::Compare => Instruction::cmp(reg(0), reg(1)),
        Format::Branch => Instruction::branch(opcode, imm),
        Format::Bare => Instruction::new(opcode),
    })
}

/// Operand kinds expected by a format.
#[derive(Clone, Copy, Debug)]
enum Operand {
    Reg,
    Imm,
}

/// Parses `R0`..`R15` (case-insensitive).
fn parse_register(token: &str) -> Result<usize, String> {
    let digits = token
        .strip_prefix(['R', 'r'])
        .ok_or_else(|| format!("expected a register, found '{token}'"))?;
    match digits.parse::<usize>() {
        Ok(n) if n < REG_FILE_SIZE => Ok(n),
        _ => Err(format!(
            "invalid register '{token}' (R0-R{})",
            REG_FILE_SIZE - 1
        )),
    }
}

/// Parses `#n`, `#+n` or `#-n`.
fn parse_immediate(token: &str) -> Result<i32, String> {
    let digits = token
        .strip_prefix('#')
        .ok_or_else(|| format!("expected an immediate '#n', found '{token}'"))?;
    digits
        .parse::<i32>()
        .map_err(|e| format!("invalid immediate '{token}': {e}"))
}
