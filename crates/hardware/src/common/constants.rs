//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Architectural Constants:** Register count and instruction width.
//! 2. **Reporting Constants:** How much of data memory the state dump shows.

/// Number of architectural registers (`R0`..`R15`).
pub const REG_FILE_SIZE: usize = 16;

/// Size of every APEX instruction in bytes; the PC advances by this amount.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Number of data-memory words printed by the state dump.
pub const MEMORY_DUMP_WORDS: usize = 70;
