//! Program loader tests.
//!
//! Covers reading APEX assembly from disk, operand parsing, and the errors
//! reported for malformed programs.

use std::io::Write;

use apexsim_core::common::LoadError;
use apexsim_core::isa::{Instruction, Opcode};
use apexsim_core::sim::loader::{load_program, parse_program};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn write_program(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ══════════════════════════════════════════════════════════
// 1. Loading from disk
// ══════════════════════════════════════════════════════════

#[test]
fn load_program_from_file() {
    let file = write_program("MOVC,R1,#5\nMOVC,R2,#10\nADD,R3,R1,R2\nHALT\n");
    let program = load_program(file.path()).unwrap();

    assert_eq!(
        program,
        vec![
            Instruction::movc(1, 5),
            Instruction::movc(2, 10),
            Instruction::reg_reg_reg(Opcode::Add, 3, 1, 2),
            Instruction::new(Opcode::Halt),
        ]
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.asm");
    let err = load_program(&path).unwrap_err();

    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("nope.asm"), "{err}");
}

#[test]
fn empty_file_is_rejected() {
    let file = write_program("\n\n");
    assert!(matches!(load_program(file.path()), Err(LoadError::Empty)));
}

// ══════════════════════════════════════════════════════════
// 2. Operand forms
// ══════════════════════════════════════════════════════════

#[test]
fn every_operand_shape_parses() {
    let program = parse_program(
        "ADD R3,R1,R2\n\
         ADDL R4,R3,#-2\n\
         MOVC R5,#7\n\
         STORE R5,R0,#4\n\
         STR R5,R1,R2\n\
         LOAD R6,R0,#4\n\
         LDR R7,R1,R2\n\
         CMP R6,R5\n\
         BNZ #-8\n\
         NOP\n\
         HALT",
    )
    .unwrap();

    assert_eq!(program.len(), 11);
    assert_eq!(program[1], Instruction::reg_reg_imm(Opcode::Addl, 4, 3, -2));
    assert_eq!(program[3], Instruction::store(5, 0, 4));
    assert_eq!(program[4], Instruction::store_indexed(5, 1, 2));
    assert_eq!(program[5], Instruction::reg_reg_imm(Opcode::Load, 6, 0, 4));
    assert_eq!(program[7], Instruction::cmp(6, 5));
    assert_eq!(program[8], Instruction::branch(Opcode::Bnz, -8));
}

#[test]
fn mnemonics_and_registers_ignore_case() {
    let program = parse_program("movc r1,#3\nmul R2,r1,R1").unwrap();
    assert_eq!(program[0], Instruction::movc(1, 3));
    assert_eq!(program[1], Instruction::reg_reg_reg(Opcode::Mul, 2, 1, 1));
}

#[test]
fn rendered_program_parses_back() {
    let source = "MOVC,R1,#5\nSTORE,R1,R0,#4\nLDR,R2,R0,R1\nBZ,#12\nHALT";
    let program = parse_program(source).unwrap();
    let rendered: Vec<String> = program.iter().map(ToString::to_string).collect();
    assert_eq!(rendered.join("\n"), source);
}

// ══════════════════════════════════════════════════════════
// 3. Errors
// ══════════════════════════════════════════════════════════

#[test]
fn unknown_mnemonic_reports_line() {
    let err = parse_program("MOVC R1,#1\n\nJMP #4").unwrap_err();
    match err {
        LoadError::Parse { line, message } => {
            assert_eq!(line, 3);
            assert!(message.contains("JMP"), "{message}");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn register_out_of_range_rejected() {
    assert!(matches!(
        parse_program("ADD R1,R2,R16"),
        Err(LoadError::Parse { line: 1, .. })
    ));
}

#[test]
fn immediate_without_hash_rejected() {
    let err = parse_program("MOVC R1,5").unwrap_err();
    assert!(err.to_string().contains("immediate"), "{err}");
}

#[test]
fn register_where_immediate_expected_rejected() {
    assert!(parse_program("ADDL R1,R2,R3").is_err());
}

#[test]
fn extra_operand_rejected() {
    let err = parse_program("HALT R1").unwrap_err();
    assert!(err.to_string().contains("expects 0 operand(s), found 1"), "{err}");
}
