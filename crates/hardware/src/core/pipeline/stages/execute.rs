//! Execute (EX) Stage.
//!
//! Advances every functional-unit lane by one cycle. An instruction whose
//! latency has elapsed computes its result, updates the zero flag unless a
//! younger instruction already has, and, for a taken branch, redirects fetch. Completed instructions then compete for
//! the single post-execute latch; the oldest one by dispatch sequence wins
//! and the others keep their lane (and their result) until a later cycle.

use tracing::{debug, trace};

use crate::common::{Fault, FaultKind};
use crate::core::Cpu;
use crate::core::pipeline::engine::Pipeline;
use crate::core::pipeline::latches::{ExecutedEntry, IssueEntry};
use crate::core::units::alu::Alu;
use crate::core::units::bru::Bru;
use crate::core::units::lsu::Lsu;
use crate::isa::{Format, OpClass, Opcode};

/// Executes the execute stage of the pipeline.
///
/// Lanes are evaluated oldest instruction first. The zero flag keeps the
/// result of the youngest writer to have executed, whatever the completion
/// order.
///
/// # Arguments
///
/// * `cpu` - Mutable reference to the CPU state.
/// * `pipe` - The pipeline latches.
///
/// # Errors
///
/// Returns the [`Fault`] raised by a completing instruction (division by
/// zero, data address out of bounds, or an invalid branch target).
pub fn execute_stage(cpu: &mut Cpu, pipe: &mut Pipeline) -> Result<(), Fault> {
    let mut order: Vec<usize> = (0..pipe.lanes.len())
        .filter(|&i| pipe.lanes[i].slot.is_occupied())
        .collect();
    order.sort_by_key(|&i| pipe.lanes[i].slot.get().map(|e| e.issue.seq));

    let memory_stage = pipe.has_memory_stage();
    for idx in order {
        let Some(lane_entry) = pipe.lanes[idx].slot.get_mut() else {
            continue;
        };
        if lane_entry.done.is_some() {
            continue;
        }
        lane_entry.issue.remaining = lane_entry.issue.remaining.saturating_sub(1);
        if lane_entry.issue.remaining > 0 {
            trace!(pc = lane_entry.issue.pc, remaining = lane_entry.issue.remaining, "EX  busy");
            continue;
        }

        let issue = lane_entry.issue;
        let (executed, redirect) = execute_one(cpu, &issue, memory_stage)?;
        lane_entry.done = Some(executed);
        trace!(pc = issue.pc, inst = %issue.inst, result = executed.result, "EX  complete");

        if let Some(target) = redirect {
            cpu.pc = target;
            pipe.redirect_pending = true;
            pipe.flush_front_end();
            pipe.fetch_active = true;
            cpu.stats.flushes += 1;
            debug!(pc = issue.pc, target, "EX  branch taken, front end flushed");
        }
    }

    advance_oldest(pipe);
    Ok(())
}

/// Moves the oldest completed lane entry into the post-execute latch.
fn advance_oldest(pipe: &mut Pipeline) {
    let memory_stage = pipe.has_memory_stage();
    let downstream_free = if memory_stage {
        pipe.ex_mem.is_empty()
    } else {
        pipe.mem_wb.is_empty()
    };
    if !downstream_free {
        return;
    }

    let winner = pipe
        .lanes
        .iter_mut()
        .filter(|lane| lane.slot.get().is_some_and(|e| e.done.is_some()))
        .min_by_key(|lane| lane.slot.get().map(|e| e.issue.seq));
    let Some(done) = winner
        .and_then(|lane| lane.slot.take())
        .and_then(|entry| entry.done)
    else {
        return;
    };

    if memory_stage {
        pipe.ex_mem.fill(done);
    } else {
        pipe.mem_wb.fill(done);
    }
}

/// The ALU operands for `issue`, by operand layout.
const fn alu_operands(issue: &IssueEntry) -> (i32, i32) {
    match issue.inst.opcode.format() {
        Format::RegRegImm => (issue.rv1, issue.inst.imm),
        Format::RegImm => (0, issue.inst.imm),
        _ => (issue.rv1, issue.rv2),
    }
}

/// Computes one instruction.
///
/// # Returns
///
/// The executed entry and, for a taken branch, the PC to redirect fetch to.
fn execute_one(
    cpu: &mut Cpu,
    issue: &IssueEntry,
    memory_stage: bool,
) -> Result<(ExecutedEntry, Option<u32>), Fault> {
    let op = issue.inst.opcode;
    let fault = |kind: FaultKind| Fault::new(kind, issue.pc, op);
    let mut out = ExecutedEntry {
        pc: issue.pc,
        seq: issue.seq,
        inst: issue.inst,
        result: 0,
        address: None,
    };
    let mut redirect = None;

    match op.class() {
        OpClass::Load | OpClass::Store => {
            let address = Lsu::effective_address(issue).unwrap_or_default();
            let idx = Lsu::resolve(&cpu.memory, address).map_err(fault)?;
            out.address = Some(idx);
            if op.is_store() {
                out.result = Lsu::store_value(issue);
            } else if !memory_stage {
                out.result = cpu
                    .memory
                    .read(idx)
                    .ok_or_else(|| fault(FaultKind::AddressOutOfBounds { address }))?;
            }
        }
        OpClass::Branch => {
            if Bru::taken(op, cpu.zero_flag) {
                let target = Bru::target(issue.pc, issue.inst.imm);
                let pc = Bru::redirect(&cpu.program, target)
                    .ok_or_else(|| fault(FaultKind::BranchTarget { target }))?;
                redirect = Some(pc);
            }
        }
        OpClass::Other => {}
        OpClass::Alu | OpClass::Mul | OpClass::Compare => {
            let (a, b) = alu_operands(issue);
            out.result = Alu::execute(op, a, b).map_err(fault)?;
            if op.writes_zero_flag() {
                let zero = if op == Opcode::Cmp {
                    out.result != 0
                } else {
                    out.result == 0
                };
                cpu.write_zero_flag(issue.seq, zero);
                cpu.scoreboard.release_zero();
            }
        }
    }

    Ok((out, redirect))
}
