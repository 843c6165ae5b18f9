//! APEX pipeline simulator library.
//!
//! This crate implements a cycle-accurate simulator of the in-order APEX teaching
//! pipeline with the following:
//! 1. **Core:** Fetch, decode/issue, functional-unit lanes, optional memory stage, and writeback.
//! 2. **Hazards:** A per-register scoreboard that stalls decode on read-after-write and write-after-write.
//! 3. **ISA:** The APEX opcode set (arithmetic, compare, branch, load/store, move-immediate).
//! 4. **Simulation:** Program loader, configuration, statistics, and the `Simulator` driver API.

/// Common types and constants (registers, errors, sizes).
pub mod common;
/// Simulator configuration (defaults, topology, hierarchical config structures).
pub mod config;
/// CPU core (architectural state, pipeline, execution units).
pub mod core;
/// Instruction set (opcodes, instruction records, disassembly).
pub mod isa;
/// Program loader and the top-level simulator.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Architectural state of the CPU (registers, scoreboard, data memory, PC).
pub use crate::core::Cpu;
/// Decoded instruction record.
pub use crate::isa::{Instruction, Opcode};
/// Top-level simulator; construct with `Simulator::initialize`.
pub use crate::sim::simulator::{HaltReason, Simulator, Status, TickResult};
