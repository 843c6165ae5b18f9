//! Pipeline engine.
//!
//! Owns every latch between the stages and advances them one logical clock
//! tick at a time. Stage simultaneity is modelled by evaluating the stages in
//! reverse order within a tick:
//!
//! ```text
//! Writeback -> Memory (optional) -> Execute lanes -> Decode -> Fetch
//! ```
//!
//! so each stage consumes what its successor vacated earlier in the same
//! tick, and an instruction advances at most one stage per tick.

use tracing::{debug, trace, warn};

use crate::common::Fault;
use crate::config::{PipelineConfig, Topology};
use crate::core::Cpu;
use crate::core::pipeline::latches::{ExecutedEntry, FrontEntry, Lane, LaneKind, Latch};
use crate::core::pipeline::stages::{decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage};
use crate::core::pipeline::traits::{
    PipelineLatch, SnapshotEntry, StageId, StageSnapshot, TraceSink,
};
use crate::isa::Opcode;

/// What a completed tick means for the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// More work remains.
    Running,
    /// A `HALT` instruction retired this tick.
    HaltRetired,
    /// Fetch ran off the program and every latch has drained.
    ProgramExhausted,
}

/// The in-order APEX pipeline.
#[derive(Clone, Debug)]
pub struct Pipeline {
    /// Fetch staging latch (instruction read but not yet accepted by decode).
    pub fetch: Latch<FrontEntry>,
    /// Decode/register-read latch.
    pub decode: Latch<FrontEntry>,
    /// Functional-unit lanes, in dispatch-search order.
    pub lanes: Vec<Lane>,
    /// Execute -> Memory latch (unused without a memory stage).
    pub ex_mem: Latch<ExecutedEntry>,
    /// Latch feeding writeback.
    pub mem_wb: Latch<ExecutedEntry>,
    /// Whether fetch may read new instructions.
    pub fetch_active: bool,
    /// A taken branch redirected the PC this tick; fetch skips one cycle.
    pub redirect_pending: bool,
    /// Next dispatch sequence number handed out by fetch.
    pub next_seq: u64,
    memory_stage: bool,
    multiply_latency: u32,
}

impl Pipeline {
    /// Builds an empty pipeline with the lanes `config` asks for.
    pub fn new(config: &PipelineConfig) -> Self {
        let lanes = match config.topology {
            Topology::Split => vec![
                Lane::new(LaneKind::Integer),
                Lane::new(LaneKind::Multiply),
                Lane::new(LaneKind::LoadStore),
            ],
            Topology::Unified => vec![Lane::new(LaneKind::Unified)],
        };
        Self {
            fetch: Latch::Empty,
            decode: Latch::Empty,
            lanes,
            ex_mem: Latch::Empty,
            mem_wb: Latch::Empty,
            fetch_active: true,
            redirect_pending: false,
            next_seq: 0,
            memory_stage: config.memory_stage || config.topology == Topology::Unified,
            multiply_latency: config.multiply_latency.max(1),
        }
    }

    /// Whether loads read memory in a dedicated stage after execute.
    pub const fn has_memory_stage(&self) -> bool {
        self.memory_stage
    }

    /// Cycles an instruction of `op` occupies its lane.
    pub const fn latency(&self, op: Opcode) -> u32 {
        match op {
            Opcode::Mul => self.multiply_latency,
            _ => 1,
        }
    }

    /// Whether no instruction is in flight anywhere in the pipeline.
    pub fn is_empty(&self) -> bool {
        let latches: [&dyn PipelineLatch; 4] =
            [&self.fetch, &self.decode, &self.ex_mem, &self.mem_wb];
        latches.iter().all(|l| l.is_empty()) && self.lanes.iter().all(PipelineLatch::is_empty)
    }

    /// Whether the program has run out: nothing left to fetch and nothing in flight.
    pub fn is_drained(&self) -> bool {
        !self.fetch_active && !self.redirect_pending && self.is_empty()
    }

    /// Discards the front-end latches after a taken branch.
    pub fn flush_front_end(&mut self) {
        self.fetch.flush();
        self.decode.flush();
    }

    /// Clears the stall flags of the front-end latches.
    pub fn clear_stalls(&mut self) {
        for latch in [&mut self.fetch, &mut self.decode] {
            if let Some(entry) = latch.get_mut() {
                entry.stalled = false;
            }
        }
    }

    /// Runs one cycle of the entire pipeline.
    ///
    /// Every stage reports what it held to `sink`, writeback first.
    ///
    /// # Errors
    ///
    /// Returns the [`Fault`] raised by an executing instruction. The tick is
    /// abandoned at that point; the faulting instruction has no architectural
    /// effect.
    pub fn tick(&mut self, cpu: &mut Cpu, sink: &mut dyn TraceSink) -> Result<TickOutcome, Fault> {
        cpu.stats.cycles += 1;
        let cycle = cpu.stats.cycles;
        let mut emit = |stage: StageId, entry: Option<SnapshotEntry>| {
            sink.on_stage(&StageSnapshot { cycle, stage, entry });
        };

        let retired = wb_stage(cpu, self);
        emit(
            StageId::Writeback,
            retired.map(|e| SnapshotEntry {
                pc: e.pc,
                instruction: e.inst,
            }),
        );
        if retired.is_some_and(|e| e.inst.opcode == Opcode::Halt) {
            debug!(cycle, retired = cpu.stats.instructions_retired, "HALT retired");
            return Ok(TickOutcome::HaltRetired);
        }

        if self.memory_stage {
            let accessed = mem_stage(cpu, self)
                .inspect_err(|fault| warn!(cycle, %fault, "fault in memory stage"))?;
            emit(StageId::Memory, accessed);
        }

        for lane in &self.lanes {
            emit(
                StageId::Execute(lane.kind),
                lane.slot.get().map(|e| SnapshotEntry {
                    pc: e.issue.pc,
                    instruction: e.issue.inst,
                }),
            );
        }
        execute_stage(cpu, self).inspect_err(|fault| warn!(cycle, %fault, "fault in execute"))?;

        let decoded = decode_stage(cpu, self);
        emit(StageId::Decode, decoded);

        let fetched = fetch_stage(cpu, self);
        emit(StageId::Fetch, fetched);

        if self.is_drained() {
            debug!(cycle, "program exhausted and pipeline drained");
            return Ok(TickOutcome::ProgramExhausted);
        }
        trace!(cycle, pc = cpu.pc, "tick complete");
        Ok(TickOutcome::Running)
    }
}
