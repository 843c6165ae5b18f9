//! Instruction Fetch (IF) Stage.
//!
//! Reads the instruction at the PC into the fetch staging latch and hands it
//! to decode when decode has room. The PC advances only when an instruction
//! is accepted by decode, so while fetch is stalled the PC keeps pointing at
//! the held instruction.

use tracing::{debug, trace};

use crate::common::INSTRUCTION_SIZE;
use crate::core::Cpu;
use crate::core::pipeline::engine::Pipeline;
use crate::core::pipeline::latches::FrontEntry;
use crate::core::pipeline::traits::SnapshotEntry;
use crate::isa::Opcode;

/// Executes the instruction fetch stage.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `pipe` - The pipeline latches.
///
/// # Returns
///
/// The instruction fetch held or forwarded this cycle, or `None` when fetch
/// was inactive, suppressed by a redirect, or ran off the program.
///
/// # Behavior
///
/// - Skips one cycle after a taken branch installed a new PC
/// - Fetches `HALT` once and then stops, leaving the PC at the `HALT`
/// - Becomes inactive when the PC leaves the program
pub fn fetch_stage(cpu: &mut Cpu, pipe: &mut Pipeline) -> Option<SnapshotEntry> {
    if !pipe.fetch_active {
        return None;
    }
    if pipe.redirect_pending {
        pipe.redirect_pending = false;
        trace!(pc = cpu.pc, "IF  fetch suppressed after redirect");
        return None;
    }

    if pipe.fetch.is_empty() {
        let Some(inst) = cpu.program.fetch(cpu.pc) else {
            pipe.fetch_active = false;
            debug!(pc = cpu.pc, "IF  pc outside program, fetch stopped");
            return None;
        };
        let seq = pipe.next_seq;
        pipe.next_seq += 1;
        pipe.fetch.fill(FrontEntry::new(cpu.pc, seq, inst));
    }

    let entry = pipe.fetch.get_mut()?;
    let snapshot = SnapshotEntry {
        pc: entry.pc,
        instruction: entry.inst,
    };

    if pipe.decode.is_occupied() {
        entry.stalled = true;
        trace!(pc = entry.pc, "IF  held, decode occupied");
        return Some(snapshot);
    }

    let mut entry = pipe.fetch.take()?;
    entry.stalled = false;
    let is_halt = entry.inst.opcode == Opcode::Halt;
    trace!(pc = entry.pc, seq = entry.seq, inst = %entry.inst, "IF  -> ID");
    pipe.decode.fill(entry);

    if is_halt {
        pipe.fetch_active = false;
        debug!(pc = cpu.pc, "IF  HALT fetched, fetch stopped");
    } else {
        cpu.pc = cpu.pc.wrapping_add(INSTRUCTION_SIZE);
    }
    Some(snapshot)
}
