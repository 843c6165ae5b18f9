//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline.
//! It commits register results and stores, releases scoreboard entries,
//! and updates retirement statistics.

use tracing::{info, trace};

use crate::core::Cpu;
use crate::core::pipeline::engine::Pipeline;
use crate::core::pipeline::latches::ExecutedEntry;

/// Executes the writeback stage of the pipeline.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `pipe` - The pipeline latches.
///
/// # Returns
///
/// The instruction retired this cycle, if any.
///
/// # Behavior
///
/// - Register producers write their result, clear their scoreboard entry,
///   and release the front-end stall flags
/// - Stores write data memory
/// - `CMP`, branches, `NOP` and `HALT` commit nothing
/// - Every retirement counts once in the statistics
pub fn wb_stage(cpu: &mut Cpu, pipe: &mut Pipeline) -> Option<ExecutedEntry> {
    let entry = pipe.mem_wb.take()?;
    let op = entry.inst.opcode;

    if let Some(rd) = entry.inst.dest() {
        cpu.regs.write(rd, entry.result);
        cpu.scoreboard.clear(rd);
        pipe.clear_stalls();
    } else if op.is_store() {
        if let Some(idx) = entry.address {
            let stored = cpu.memory.write(idx, entry.result);
            debug_assert!(stored, "store index validated in execute");
        }
    }

    cpu.stats.record_retire(op);

    if cpu.trace || cfg!(feature = "commit-log") {
        info!(
            target: "apexsim::commit",
            cycle = cpu.stats.cycles,
            pc = entry.pc,
            "{}",
            entry.inst
        );
    } else {
        trace!(pc = entry.pc, inst = %entry.inst, "WB  retire");
    }
    Some(entry)
}
