//! End-to-end program scenarios.
//!
//! Each test runs a short APEX program to completion and checks the final
//! architectural state together with the exact cycle count the timing model
//! produces for it.

use apexsim_core::common::FaultKind;
use apexsim_core::config::{PipelineConfig, Topology};
use apexsim_core::{HaltReason, Opcode, Status};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::TestContext;

const ADD_CHAIN: &str = "MOVC R1,#5\nMOVC R2,#10\nADD R3,R1,R2\nHALT";
const DEPENDENT_CHAIN: &str = "MOVC R1,#5\nADD R2,R1,R1\nSUB R3,R2,R1";
const BRANCH_SKIP: &str = "MOVC R1,#0\nBZ #8\nMOVC R2,#99\nMOVC R3,#1";
const STORE_THEN_LOAD: &str = "MOVC R1,#20\nSTORE R1,R0,#4\nLOAD R2,R0,#4";
const DIVIDE_BY_ZERO: &str = "MOVC R1,#7\nMOVC R2,#0\nDIV R3,R1,R2";

// ══════════════════════════════════════════════════════════
// 1. Straight-line arithmetic
// ══════════════════════════════════════════════════════════

#[test]
fn add_chain_halts_with_sum() {
    let mut ctx = TestContext::new(ADD_CHAIN);
    ctx.run_to_halt();

    assert_eq!(ctx.reg(1), 5);
    assert_eq!(ctx.reg(2), 10);
    assert_eq!(ctx.reg(3), 15);
    assert_eq!(ctx.halt_reason(), Some(HaltReason::HaltRetired));
    assert_eq!(ctx.stats().instructions_retired, 4);
    assert_eq!(ctx.cycles(), 8, "one RAW stall on R2 in an 8-cycle run");
    assert_eq!(ctx.stats().stalls_data, 1);
}

#[test]
fn add_chain_leaves_every_register_valid() {
    let mut ctx = TestContext::new(ADD_CHAIN);
    ctx.run_to_halt();
    for r in 0..16 {
        assert!(ctx.reg_valid(r), "R{r} should be valid after HALT retires");
    }
}

#[test]
fn halt_leaves_pc_on_halt_instruction() {
    let mut ctx = TestContext::new(ADD_CHAIN);
    ctx.run_to_halt();
    assert_eq!(ctx.sim.pc(), 4012);
}

#[test]
fn dependent_chain_stalls_twice() {
    let mut ctx = TestContext::new(DEPENDENT_CHAIN);
    ctx.run_to_halt();

    assert_eq!(ctx.reg(1), 5);
    assert_eq!(ctx.reg(2), 10);
    assert_eq!(ctx.reg(3), 5);
    assert_eq!(ctx.halt_reason(), Some(HaltReason::ProgramExhausted));
    assert_eq!(ctx.stats().instructions_retired, 3);
    assert_eq!(ctx.stats().stalls_data, 2, "ADD waits on R1, SUB waits on R2");
    assert_eq!(ctx.cycles(), 8);
}

#[test]
fn independent_instructions_do_not_stall() {
    let mut ctx = TestContext::new("MOVC R1,#1\nMOVC R2,#2\nMOVC R3,#3\nHALT");
    ctx.run_to_halt();

    assert_eq!(ctx.stats().stalls_data, 0);
    assert_eq!(ctx.regs()[1..4].to_vec(), vec![1, 2, 3]);
    assert_eq!(ctx.cycles(), 7, "four instructions through a 4-deep pipe");
}

// ══════════════════════════════════════════════════════════
// 2. Control flow
// ══════════════════════════════════════════════════════════

#[test]
fn taken_branch_skips_instruction() {
    let mut ctx = TestContext::new(BRANCH_SKIP);
    ctx.run_to_halt();

    assert_eq!(ctx.reg(2), 0, "MOVC R2,#99 is on the wrong path");
    assert_eq!(ctx.reg(3), 1);
    assert_eq!(ctx.stats().flushes, 1);
    assert_eq!(ctx.stats().instructions_retired, 3);
    assert_eq!(ctx.cycles(), 8);
    assert_eq!(ctx.halt_reason(), Some(HaltReason::ProgramExhausted));
}

#[test]
fn untaken_branch_falls_through() {
    let mut ctx = TestContext::new("MOVC R1,#1\nBZ #8\nMOVC R2,#99\nMOVC R3,#1");
    ctx.run_to_halt();

    assert_eq!(ctx.reg(2), 99);
    assert_eq!(ctx.reg(3), 1);
    assert_eq!(ctx.stats().flushes, 0);
    assert_eq!(ctx.stats().instructions_retired, 4);
}

// ══════════════════════════════════════════════════════════
// 3. Memory
// ══════════════════════════════════════════════════════════

#[test]
fn store_then_load_round_trips_through_memory() {
    let mut ctx = TestContext::new(STORE_THEN_LOAD);
    ctx.run_to_halt();

    assert_eq!(ctx.mem(4), 20);
    assert_eq!(ctx.reg(2), 20);
    assert_eq!(ctx.cycles(), 7);
    assert_eq!(ctx.stats().inst_store, 1);
    assert_eq!(ctx.stats().inst_load, 1);
}

#[test]
fn store_then_load_with_memory_stage() {
    let mut ctx = TestContext::with_pipeline(
        STORE_THEN_LOAD,
        PipelineConfig {
            memory_stage: true,
            ..PipelineConfig::default()
        },
    );
    ctx.run_to_halt();

    assert_eq!(ctx.mem(4), 20);
    assert_eq!(ctx.reg(2), 20);
    assert_eq!(ctx.cycles(), 9);
    assert_eq!(ctx.stats().stalls_data, 2);
}

#[test]
fn indexed_store_and_load() {
    let mut ctx = TestContext::new(
        "MOVC R1,#42\nMOVC R2,#3\nMOVC R3,#4\nSTR R1,R2,R3\nLDR R4,R3,R2\nHALT",
    );
    ctx.run_to_halt();

    assert_eq!(ctx.mem(7), 42);
    assert_eq!(ctx.reg(4), 42);
}

// ══════════════════════════════════════════════════════════
// 4. Faults
// ══════════════════════════════════════════════════════════

#[test]
fn divide_by_zero_faults_without_writing_destination() {
    let mut ctx = TestContext::new(DIVIDE_BY_ZERO);
    let fault = ctx.run_to_fault();

    assert_eq!(fault.kind, FaultKind::DivideByZero);
    assert_eq!(fault.pc, 4008);
    assert_eq!(fault.opcode, Opcode::Div);
    assert_eq!(ctx.cycles(), 6);
    assert_eq!(ctx.reg(3), 0);
    assert!(!ctx.reg_valid(3), "R3 still has its pending writer");
    assert_eq!(ctx.status(), &Status::Faulted(fault));
}

#[test]
fn divide_truncates_toward_zero() {
    let mut ctx = TestContext::new("MOVC R1,#-7\nMOVC R2,#2\nDIV R3,R1,R2\nHALT");
    ctx.run_to_halt();
    assert_eq!(ctx.reg(3), -3);
}

// ══════════════════════════════════════════════════════════
// 5. Same program, every pipeline shape
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::split(Topology::Split, false, 8, 1)]
#[case::split_with_memory_stage(Topology::Split, true, 10, 2)]
#[case::unified(Topology::Unified, true, 10, 2)]
fn add_chain_across_topologies(
    #[case] topology: Topology,
    #[case] memory_stage: bool,
    #[case] cycles: u64,
    #[case] stalls_data: u64,
) {
    let mut ctx = TestContext::with_pipeline(
        ADD_CHAIN,
        PipelineConfig {
            topology,
            memory_stage,
            ..PipelineConfig::default()
        },
    );
    ctx.run_to_halt();

    assert_eq!(ctx.reg(3), 15);
    assert_eq!(ctx.cycles(), cycles);
    assert_eq!(ctx.stats().stalls_data, stalls_data);
    assert_eq!(ctx.stats().instructions_retired, 4);
}

#[rstest]
#[case::add_chain(ADD_CHAIN)]
#[case::dependent_chain(DEPENDENT_CHAIN)]
#[case::branch_skip(BRANCH_SKIP)]
#[case::store_then_load(STORE_THEN_LOAD)]
fn unified_and_split_agree_on_results(#[case] source: &str) {
    let mut split = TestContext::new(source);
    split.run_to_halt();
    let mut unified = TestContext::with_pipeline(source, PipelineConfig::unified());
    unified.run_to_halt();

    assert_eq!(split.regs(), unified.regs());
    assert_eq!(split.sim.data_memory(), unified.sim.data_memory());
    assert_eq!(
        split.stats().instructions_retired,
        unified.stats().instructions_retired
    );
}
