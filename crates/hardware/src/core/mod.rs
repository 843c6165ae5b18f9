//! Core processor implementation.
//!
//! This module contains the APEX CPU: its architectural state, the in-order
//! pipeline that advances it one cycle at a time, and the execution units
//! the pipeline's functional-unit lanes use.

/// CPU architectural state (registers, scoreboard, memories, statistics).
pub mod cpu;

/// Instruction pipeline implementation (stages, latches, hazards, engine).
pub mod pipeline;

/// Execution units (ALU, branch resolution, load/store address unit).
pub mod units;

pub use self::cpu::Cpu;
