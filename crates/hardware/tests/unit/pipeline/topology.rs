//! Lane topology, memory stage, and multiply latency tests.

use apexsim_core::config::{PipelineConfig, Topology};
use apexsim_core::core::pipeline::{Pipeline, StageId};
use apexsim_core::core::pipeline::latches::LaneKind;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::TestContext;

fn split(multiply_latency: u32) -> PipelineConfig {
    PipelineConfig {
        multiply_latency,
        ..PipelineConfig::default()
    }
}

fn unified(multiply_latency: u32) -> PipelineConfig {
    PipelineConfig {
        multiply_latency,
        ..PipelineConfig::unified()
    }
}

// ══════════════════════════════════════════════════════════
// 1. Lane layout
// ══════════════════════════════════════════════════════════

#[test]
fn split_topology_has_three_lanes() {
    let pipe = Pipeline::new(&PipelineConfig::default());
    let kinds: Vec<_> = pipe.lanes.iter().map(|l| l.kind).collect();
    assert_eq!(
        kinds,
        vec![LaneKind::Integer, LaneKind::Multiply, LaneKind::LoadStore]
    );
    assert!(!pipe.has_memory_stage());
}

#[test]
fn unified_topology_has_one_lane_and_memory_stage() {
    let pipe = Pipeline::new(&PipelineConfig::unified());
    assert_eq!(pipe.lanes.len(), 1);
    assert_eq!(pipe.lanes[0].kind, LaneKind::Unified);
    assert!(pipe.has_memory_stage());
}

#[test]
fn lane_stage_names() {
    assert_eq!(StageId::Execute(LaneKind::Integer).to_string(), "INT EX");
    assert_eq!(StageId::Execute(LaneKind::Multiply).to_string(), "MUL EX");
    assert_eq!(StageId::Execute(LaneKind::LoadStore).to_string(), "LOAD EX");
    assert_eq!(StageId::Execute(LaneKind::Unified).to_string(), "EX");
    assert_eq!(StageId::Decode.to_string(), "DECODE_RF");
}

// ══════════════════════════════════════════════════════════
// 2. Multiply latency
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::single_cycle(1, 8, 0)]
#[case::three_cycles(3, 10, 2)]
fn halt_waits_for_multiply(
    #[case] latency: u32,
    #[case] cycles: u64,
    #[case] structural: u64,
) {
    let mut ctx =
        TestContext::with_pipeline("MOVC R1,#3\nMOVC R2,#4\nMUL R3,R1,R2\nHALT", split(latency));
    ctx.run_to_halt();

    assert_eq!(ctx.reg(3), 12);
    assert_eq!(ctx.cycles(), cycles);
    assert_eq!(ctx.stats().stalls_structural, structural);
    assert_eq!(ctx.stats().inst_mul, 1);
}

#[test]
fn younger_alu_op_overtakes_slow_multiply() {
    let mut ctx =
        TestContext::with_pipeline("MOVC R1,#2\nMUL R2,R1,R1\nADDL R3,R1,#5\nHALT", split(3));
    ctx.step(7).unwrap();

    assert_eq!(ctx.reg(3), 7);
    assert!(ctx.reg_valid(3), "ADDL retired first");
    assert!(!ctx.reg_valid(2), "MUL is still in flight");

    ctx.run_to_halt();
    assert_eq!(ctx.reg(2), 4);
    assert_eq!(ctx.cycles(), 9);
}

#[test]
fn oldest_completed_instruction_wins_writeback_latch() {
    // MUL and ADDL finish in the same cycle; MUL is older and goes first.
    let mut ctx =
        TestContext::with_pipeline("MOVC R1,#2\nMUL R2,R1,R1\nADDL R3,R1,#5\nHALT", split(2));
    ctx.step(7).unwrap();

    assert_eq!(ctx.reg(2), 4);
    assert!(ctx.reg_valid(2));
    assert!(!ctx.reg_valid(3), "ADDL waits in its lane behind the older MUL");

    ctx.run_to_halt();
    assert_eq!(ctx.reg(3), 7);
    assert_eq!(ctx.cycles(), 9);
}

#[test]
fn split_lanes_let_independent_work_pass_a_multiply() {
    let source = "MOVC R1,#3\nMUL R2,R1,R1\nADDL R3,R0,#1\nHALT";

    let mut split_ctx = TestContext::with_pipeline(source, split(3));
    split_ctx.run_to_halt();
    let mut unified_ctx = TestContext::with_pipeline(source, unified(3));
    unified_ctx.run_to_halt();

    assert_eq!(split_ctx.regs(), unified_ctx.regs());
    assert_eq!(split_ctx.stats().stalls_structural, 1);
    assert!(
        unified_ctx.stats().stalls_structural > split_ctx.stats().stalls_structural,
        "a single lane serializes ADDL behind MUL"
    );
}

// ══════════════════════════════════════════════════════════
// 3. Memory stage
// ══════════════════════════════════════════════════════════

#[test]
fn memory_stage_adds_one_cycle_per_dependency() {
    let source = "MOVC R1,#5\nMOVC R2,#10\nADD R3,R1,R2\nHALT";

    let mut without = TestContext::with_pipeline(source, PipelineConfig::default());
    without.run_to_halt();
    let mut with = TestContext::with_pipeline(
        source,
        PipelineConfig {
            memory_stage: true,
            ..PipelineConfig::default()
        },
    );
    with.run_to_halt();

    assert_eq!(without.cycles(), 8);
    assert_eq!(with.cycles(), 10);
    assert_eq!(with.reg(3), without.reg(3));
}

#[test]
fn unified_topology_reports_memory_stage() {
    let ctx = TestContext::with_pipeline("HALT", unified(1));
    assert!(ctx.sim.pipeline.has_memory_stage());
    assert_eq!(ctx.sim.pipeline.lanes.len(), 1);
}

#[test]
fn lone_halt_retires_in_every_shape() {
    for (config, cycles) in [
        (PipelineConfig::default(), 4),
        (
            PipelineConfig {
                topology: Topology::Split,
                memory_stage: true,
                multiply_latency: 1,
            },
            5,
        ),
        (PipelineConfig::unified(), 5),
    ] {
        let mut ctx = TestContext::with_pipeline("HALT", config);
        ctx.run_to_halt();
        assert_eq!(ctx.cycles(), cycles);
        assert_eq!(ctx.stats().instructions_retired, 1);
    }
}
