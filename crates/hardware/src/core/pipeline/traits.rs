//! Pipeline Latch and Trace Interfaces.
//!
//! This module defines the common traits for pipeline components. It provides:
//! 1. **Pipeline Latch Interface:** Flushing and status checks shared by every latch.
//! 2. **Trace Sink Interface:** An observer that receives a snapshot of every stage each cycle.

use std::fmt;

use crate::core::pipeline::latches::{Latch, Lane, LaneKind};
use crate::isa::Instruction;

/// Represents a pipeline latch (inter-stage buffer).
///
/// Latches hold the state of instructions as they move between stages. They support
/// flushing and status checks.
pub trait PipelineLatch {
    /// Discards the latch contents.
    ///
    /// Called on the front-end latches when a taken branch redirects fetch.
    fn flush(&mut self);

    /// Checks if the latch is empty.
    ///
    /// # Returns
    ///
    /// `true` if there is no instruction in the latch, `false` otherwise.
    fn is_empty(&self) -> bool;
}

impl<T> PipelineLatch for Latch<T> {
    fn flush(&mut self) {
        *self = Self::Empty;
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl PipelineLatch for Lane {
    fn flush(&mut self) {
        self.slot.flush();
    }

    fn is_empty(&self) -> bool {
        self.slot.is_empty()
    }
}

/// Identifies a stage in trace output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Instruction fetch.
    Fetch,
    /// Decode, register read, and dispatch.
    Decode,
    /// One functional-unit lane.
    Execute(LaneKind),
    /// Optional memory access stage.
    Memory,
    /// Writeback and retirement.
    Writeback,
}

impl StageId {
    /// Display name of the stage.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "FETCH",
            Self::Decode => "DECODE_RF",
            Self::Execute(kind) => kind.name(),
            Self::Memory => "MEMORY",
            Self::Writeback => "WRITEBACK",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The instruction a stage worked on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// The instruction record.
    pub instruction: Instruction,
}

/// What one stage held during one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageSnapshot {
    /// 1-based cycle number.
    pub cycle: u64,
    /// The stage.
    pub stage: StageId,
    /// The occupant, or `None` when the stage was empty.
    pub entry: Option<SnapshotEntry>,
}

impl fmt::Display for StageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!("Instruction at {} STAGE --->", self.stage);
        match self.entry {
            Some(e) => write!(f, "{label:<40}: pc({}) {}", e.pc, e.instruction),
            None => write!(f, "{label:<40}: EMPTY"),
        }
    }
}

/// Observer for per-stage activity.
///
/// The pipeline calls `on_stage` once for every stage on every tick, in the
/// order the stages are evaluated (writeback first, fetch last). Sinks must
/// not assume anything about the core beyond the snapshot they are given.
pub trait TraceSink {
    /// Receives one stage snapshot.
    fn on_stage(&mut self, snapshot: &StageSnapshot);
}

/// A sink that discards every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn on_stage(&mut self, _snapshot: &StageSnapshot) {}
}

impl TraceSink for Vec<StageSnapshot> {
    fn on_stage(&mut self, snapshot: &StageSnapshot) {
        self.push(*snapshot);
    }
}
