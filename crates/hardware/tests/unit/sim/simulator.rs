//! Simulator lifecycle tests.

use apexsim_core::common::{FaultKind, InitError};
use apexsim_core::config::Config;
use apexsim_core::{HaltReason, Opcode, Simulator, Status};
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

#[test]
fn empty_program_rejected() {
    let err = Simulator::initialize(Vec::new(), &Config::default()).unwrap_err();
    assert_eq!(err, InitError::EmptyProgram);
}

#[test]
fn fresh_simulator_state() {
    let ctx = TestContext::new("MOVC R1,#1\nHALT");

    assert_eq!(ctx.status(), &Status::Running);
    assert_eq!(ctx.cycles(), 0);
    assert_eq!(ctx.sim.pc(), 4000);
    assert!(!ctx.sim.zero_flag());
    assert_eq!(ctx.sim.data_memory().len(), 4096);
    assert!(ctx.sim.data_memory().iter().all(|&w| w == 0));
    assert_eq!(ctx.regs(), vec![0; 16]);
}

#[test]
fn ticking_after_halt_is_a_no_op() {
    let mut ctx = TestContext::new("MOVC R1,#1\nHALT");
    ctx.run_to_halt();
    let cycles = ctx.cycles();
    let stats = ctx.stats().clone();

    for _ in 0..5 {
        assert!(ctx.sim.tick().unwrap().halted);
    }
    assert_eq!(ctx.cycles(), cycles);
    assert_eq!(ctx.stats(), &stats);
    assert_eq!(ctx.halt_reason(), Some(HaltReason::HaltRetired));
}

#[test]
fn faulted_simulator_repeats_fault() {
    let mut ctx = TestContext::new("MOVC R1,#7\nMOVC R2,#0\nDIV R3,R1,R2");
    let fault = ctx.run_to_fault();

    for _ in 0..3 {
        assert_eq!(ctx.sim.tick().unwrap_err(), fault);
    }
    assert_eq!(ctx.cycles(), 6, "a faulted simulator does not advance");
    assert!(!ctx.sim.is_halted());
    assert_eq!(ctx.halt_reason(), None);
}

#[test]
fn run_stops_at_cycle_budget() {
    let mut ctx = TestContext::new("MOVC R1,#5\nMOVC R2,#10\nADD R3,R1,R2\nHALT");
    let result = ctx.sim.run(3).unwrap();

    assert!(!result.halted);
    assert_eq!(ctx.cycles(), 3);
    assert_eq!(ctx.status(), &Status::Running);
}

#[test]
fn running_off_the_end_halts() {
    let mut ctx = TestContext::new("MOVC R1,#1\nMOVC R2,#2");
    ctx.run_to_halt();
    assert_eq!(ctx.halt_reason(), Some(HaltReason::ProgramExhausted));
    assert_eq!(ctx.stats().instructions_retired, 2);
}

#[test]
fn instructions_after_halt_never_run() {
    let mut ctx = TestContext::new("MOVC R1,#1\nHALT\nMOVC R2,#2");
    ctx.run_to_halt();
    assert_eq!(ctx.reg(2), 0);
    assert_eq!(ctx.stats().instructions_retired, 2);
}

#[test]
fn load_out_of_bounds_faults() {
    let mut ctx = TestContext::new("MOVC R1,#-1\nLOAD R2,R1,#0");
    let fault = ctx.run_to_fault();

    assert_eq!(fault.kind, FaultKind::AddressOutOfBounds { address: -1 });
    assert_eq!(fault.pc, 4004);
    assert_eq!(fault.opcode, Opcode::Load);
    assert!(fault.to_string().contains("pc=4004"), "{fault}");
}

#[test]
fn store_out_of_bounds_faults_without_writing() {
    let mut config = Config::default();
    config.memory.data_memory_words = 16;
    let mut ctx = TestContext::with_config("MOVC R1,#9\nSTORE R1,R0,#16\nHALT", config);
    let fault = ctx.run_to_fault();

    assert_eq!(fault.kind, FaultKind::AddressOutOfBounds { address: 16 });
    assert_eq!(fault.opcode, Opcode::Store);
    assert!(ctx.sim.data_memory().iter().all(|&w| w == 0));
}

#[test]
fn debug_output_names_simulator() {
    let ctx = TestContext::new("HALT");
    assert!(format!("{:?}", ctx.sim).starts_with("Simulator"));
}
