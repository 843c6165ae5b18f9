//! Instruction pipeline implementation.
//!
//! This module contains the implementation of the in-order APEX pipeline.
//! It includes the following components:
//! 1. **Engine:** Owns the latches and runs one tick in reverse stage order.
//! 2. **Hazards:** Detection of data hazards against the scoreboard.
//! 3. **Latches:** Inter-stage buffers and functional-unit lanes.
//! 4. **Scoreboard:** Pending-write tracking per register.
//! 5. **Stages:** Implementation of Fetch, Decode, Execute, Memory, and Writeback stages.
//! 6. **Traits:** Latch interface and the stage trace sink.

/// Pipeline engine (tick sequencing, drain detection).
pub mod engine;

/// Pipeline hazard detection.
pub mod hazards;

/// Inter-stage pipeline latches and lanes.
pub mod latches;

/// Register scoreboard.
pub mod scoreboard;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Traits for pipeline latches and trace observers.
pub mod traits;

pub use engine::{Pipeline, TickOutcome};
pub use traits::{NullSink, StageId, StageSnapshot, TraceSink};
