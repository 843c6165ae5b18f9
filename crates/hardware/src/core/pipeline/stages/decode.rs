//! Instruction Decode / Register Read (ID) Stage.
//!
//! This module implements the issue point of the pipeline. It performs the following:
//! 1. **Hazard Check:** Holds the instruction while any register it names has a pending writer,
//!    and holds a branch while an older zero-flag writer has not executed.
//! 2. **Dispatch:** Selects the functional-unit lane for the opcode and waits if it is busy.
//! 3. **Operand Read:** Copies source values from the register file into the lane.
//! 4. **Scoreboarding:** Marks the destination register, and the zero flag, pending.

use tracing::{debug, trace};

use crate::core::Cpu;
use crate::core::pipeline::engine::Pipeline;
use crate::core::pipeline::hazards;
use crate::core::pipeline::latches::{IssueEntry, LaneEntry};
use crate::core::pipeline::traits::{PipelineLatch, SnapshotEntry};
use crate::isa::Opcode;

/// Executes the decode stage of the pipeline.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `pipe` - The pipeline latches.
///
/// # Returns
///
/// The instruction held in decode this cycle, whether or not it dispatched.
///
/// # Behavior
///
/// - A register hazard stalls decode and fetch until writeback retires a producer
/// - A branch waits, without the stall flags, until no older flag writer is
///   still in a lane
/// - A busy lane (or `HALT` with any lane busy) is a structural stall and
///   sets no stall flag
/// - Opcodes without a destination never touch the register scoreboard
pub fn decode_stage(cpu: &mut Cpu, pipe: &mut Pipeline) -> Option<SnapshotEntry> {
    let entry = *pipe.decode.get()?;
    let snapshot = SnapshotEntry {
        pc: entry.pc,
        instruction: entry.inst,
    };

    if entry.stalled {
        cpu.stats.stalls_data += 1;
        trace!(pc = entry.pc, "ID  still stalled");
        return Some(snapshot);
    }

    if let Some(hazard) = hazards::detect(&entry.inst, &cpu.scoreboard) {
        // The zero flag is released in execute, not writeback, so a flag wait
        // is re-checked every cycle instead of latching the stall flags.
        if hazard.register().is_some() {
            for latch in [&mut pipe.decode, &mut pipe.fetch] {
                if let Some(e) = latch.get_mut() {
                    e.stalled = true;
                }
            }
        }
        cpu.stats.stalls_data += 1;
        debug!(pc = entry.pc, inst = %entry.inst, %hazard, "ID  data stall");
        return Some(snapshot);
    }

    let op = entry.inst.opcode;
    let unit = op.unit();
    let lane_busy = pipe
        .lanes
        .iter()
        .find(|lane| lane.kind.accepts(unit))
        .is_none_or(|lane| lane.slot.is_occupied());
    let drain_for_halt = op == Opcode::Halt && pipe.lanes.iter().any(|l| l.slot.is_occupied());
    if lane_busy || drain_for_halt {
        cpu.stats.stalls_structural += 1;
        debug!(pc = entry.pc, inst = %entry.inst, drain_for_halt, "ID  structural stall");
        return Some(snapshot);
    }

    let mut values = entry.inst.sources().map(|r| cpu.regs.read(r));
    let issue = IssueEntry {
        pc: entry.pc,
        seq: entry.seq,
        inst: entry.inst,
        rv1: values.next().unwrap_or_default(),
        rv2: values.next().unwrap_or_default(),
        rv3: values.next().unwrap_or_default(),
        remaining: pipe.latency(op),
    };
    if let Some(rd) = entry.inst.dest() {
        cpu.scoreboard.mark_pending(rd);
    }
    if op.writes_zero_flag() {
        cpu.scoreboard.mark_zero_pending();
    }

    if let Some(lane) = pipe.lanes.iter_mut().find(|lane| lane.kind.accepts(unit)) {
        trace!(pc = entry.pc, lane = %lane.kind, "ID  dispatch");
        lane.slot.fill(LaneEntry { issue, done: None });
    }
    pipe.decode.flush();
    Some(snapshot)
}
