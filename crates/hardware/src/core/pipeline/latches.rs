//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry types carried between the stages:
//! Fetch → Decode → Integer / Multiply / Load-Store lane → (Memory) → Writeback.
//!
//! 1. **Latch:** A single-slot `Empty | Occupied` buffer.
//! 2. **Entries:** What each boundary carries (front-end records, issued operands, results).
//! 3. **Lanes:** The functional-unit slots decode dispatches into.

use std::fmt;

use crate::isa::{Instruction, UnitClass};

/// A single-entry pipeline latch.
///
/// A latch holds at most one in-flight instruction. Stages only fill an empty
/// latch, so an occupied (possibly stalled) entry is never overwritten.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Latch<T> {
    /// No instruction.
    #[default]
    Empty,
    /// One in-flight instruction.
    Occupied(T),
}

impl<T> Latch<T> {
    /// Whether the latch holds nothing.
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether the latch holds an instruction.
    pub const fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    /// Borrows the occupant.
    pub const fn get(&self) -> Option<&T> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Empty => None,
        }
    }

    /// Mutably borrows the occupant.
    pub const fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Empty => None,
        }
    }

    /// Removes and returns the occupant, leaving the latch empty.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Self::Occupied(entry) => Some(entry),
            Self::Empty => None,
        }
    }

    /// Places `entry` into an empty latch.
    ///
    /// Callers check [`Latch::is_empty`] first; filling an occupied latch is a
    /// pipeline bug.
    pub fn fill(&mut self, entry: T) {
        debug_assert!(self.is_empty(), "latch overwritten while occupied");
        *self = Self::Occupied(entry);
    }
}

/// An instruction in the fetch staging latch or the decode latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Dispatch sequence number, assigned at fetch.
    pub seq: u64,
    /// The instruction record.
    pub inst: Instruction,
    /// Held back this cycle because a register was pending or decode was full.
    pub stalled: bool,
}

impl FrontEntry {
    /// A freshly fetched, unstalled entry.
    pub const fn new(pc: u32, seq: u64, inst: Instruction) -> Self {
        Self {
            pc,
            seq,
            inst,
            stalled: false,
        }
    }
}

/// An instruction dispatched to a functional-unit lane.
///
/// Source values are captured at dispatch, positionally: `rv1` holds the
/// first source named by the instruction's format, `rv2` the second, `rv3`
/// the third.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssueEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Dispatch sequence number.
    pub seq: u64,
    /// The instruction record.
    pub inst: Instruction,
    /// First source value.
    pub rv1: i32,
    /// Second source value.
    pub rv2: i32,
    /// Third source value.
    pub rv3: i32,
    /// Execute cycles left before the result is available.
    pub remaining: u32,
}

/// The result of executing an instruction.
///
/// For register producers `result` is the value to write back; for stores it
/// is the value to be stored at `address`; for loads it is filled in by the
/// memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutedEntry {
    /// Program counter of the instruction.
    pub pc: u32,
    /// Dispatch sequence number.
    pub seq: u64,
    /// The instruction record.
    pub inst: Instruction,
    /// Computed value.
    pub result: i32,
    /// Resolved data-memory index for loads and stores.
    pub address: Option<usize>,
}

/// Contents of a functional-unit lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneEntry {
    /// The dispatched instruction.
    pub issue: IssueEntry,
    /// Set once the latency has elapsed; the entry then waits for the
    /// post-execute latch.
    pub done: Option<ExecutedEntry>,
}

/// Which functional unit a lane models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Integer ALU and branch unit.
    Integer,
    /// Multiplier.
    Multiply,
    /// Load/store address unit.
    LoadStore,
    /// Single shared lane executing every opcode.
    Unified,
}

impl LaneKind {
    /// Whether this lane executes instructions of `unit`.
    pub const fn accepts(self, unit: UnitClass) -> bool {
        matches!(
            (self, unit),
            (Self::Unified, _)
                | (Self::Integer, UnitClass::Integer)
                | (Self::Multiply, UnitClass::Multiply)
                | (Self::LoadStore, UnitClass::LoadStore)
        )
    }

    /// Display name used by stage traces.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integer => "INT EX",
            Self::Multiply => "MUL EX",
            Self::LoadStore => "LOAD EX",
            Self::Unified => "EX",
        }
    }
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A functional-unit lane: its kind and its single slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lane {
    /// Unit modelled by the lane.
    pub kind: LaneKind,
    /// The instruction occupying the lane, if any.
    pub slot: Latch<LaneEntry>,
}

impl Lane {
    /// An empty lane of `kind`.
    pub const fn new(kind: LaneKind) -> Self {
        Self {
            kind,
            slot: Latch::Empty,
        }
    }
}
