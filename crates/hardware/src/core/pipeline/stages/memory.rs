//! Memory Access (MEM) Stage.
//!
//! Present only when the pipeline is configured with a memory stage (always
//! for the unified topology). Loads read data memory here at the address the
//! load/store unit already validated; everything else passes through.
//! Stores are not written here: writeback commits them.

use tracing::trace;

use crate::common::{Fault, FaultKind};
use crate::core::Cpu;
use crate::core::pipeline::engine::Pipeline;
use crate::core::pipeline::traits::SnapshotEntry;

/// Executes the memory stage of the pipeline.
///
/// # Returns
///
/// The instruction that passed through the stage this cycle.
///
/// # Errors
///
/// An address fault if a load's resolved index no longer names a word of
/// data memory.
pub fn mem_stage(cpu: &mut Cpu, pipe: &mut Pipeline) -> Result<Option<SnapshotEntry>, Fault> {
    if pipe.mem_wb.is_occupied() {
        return Ok(pipe.ex_mem.get().map(|e| SnapshotEntry {
            pc: e.pc,
            instruction: e.inst,
        }));
    }
    let Some(mut entry) = pipe.ex_mem.take() else {
        return Ok(None);
    };

    if entry.inst.opcode.is_load() {
        let idx = entry.address.unwrap_or_default();
        entry.result = cpu.memory.read(idx).ok_or_else(|| {
            Fault::new(
                FaultKind::AddressOutOfBounds {
                    address: idx as i64,
                },
                entry.pc,
                entry.inst.opcode,
            )
        })?;
        trace!(pc = entry.pc, address = idx, value = entry.result, "MEM load");
    }

    pipe.mem_wb.fill(entry);
    Ok(Some(SnapshotEntry {
        pc: entry.pc,
        instruction: entry.inst,
    }))
}
