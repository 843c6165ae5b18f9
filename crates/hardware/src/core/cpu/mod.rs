//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which holds the architectural
//! state the pipeline operates on. It coordinates the following:
//! 1. **State Management:** Registers, scoreboard, zero flag, and program counter.
//! 2. **Memory:** Bounds-checked word-addressed data memory.
//! 3. **Code:** The read-only program indexed by PC.
//! 4. **Accounting:** Performance statistics.

/// Bounds-checked data memory.
pub mod memory;

/// Read-only code memory.
pub mod program;

use crate::common::{RegisterFile, RegisterView};
use crate::config::Config;
use crate::core::pipeline::scoreboard::Scoreboard;
use crate::isa::Instruction;
use crate::stats::SimStats;

pub use memory::DataMemory;
pub use program::Program;

/// Architectural state of the APEX processor.
///
/// The pipeline latches live in [`crate::core::pipeline::engine::Pipeline`];
/// everything here is what the program itself can observe, plus the
/// scoreboard that guards it.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// General purpose registers.
    pub regs: RegisterFile,
    /// Pending-write tracking for every register.
    pub scoreboard: Scoreboard,
    /// Program counter of the next instruction to fetch.
    pub pc: u32,
    /// Set when the last flag-setting instruction produced zero (or `CMP` saw equality).
    pub zero_flag: bool,
    /// Dispatch sequence number of the instruction that last wrote `zero_flag`.
    pub zero_flag_seq: Option<u64>,
    /// Data memory.
    pub memory: DataMemory,
    /// Code memory.
    pub program: Program,
    /// Emit a commit-log line for every retirement.
    pub trace: bool,
    /// Performance statistics.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a CPU with zeroed registers and memory and the PC at the first instruction.
    ///
    /// # Arguments
    ///
    /// * `instructions` - Program in load order.
    /// * `config` - Simulator configuration (base PC, memory size, trace flag).
    pub fn new(instructions: Vec<Instruction>, config: &Config) -> Self {
        let program = Program::new(config.general.base_pc, instructions);
        Self {
            regs: RegisterFile::new(),
            scoreboard: Scoreboard::new(),
            pc: program.base_pc(),
            zero_flag: false,
            zero_flag_seq: None,
            memory: DataMemory::new(config.memory.data_memory_words),
            program,
            trace: config.general.trace,
            stats: SimStats::default(),
        }
    }

    /// Writes the zero flag on behalf of the instruction with dispatch number `seq`.
    ///
    /// Lanes finish out of program order when multiply latency exceeds one
    /// cycle; a write from an instruction older than the last writer is
    /// dropped so the flag always reflects the youngest executed writer.
    pub fn write_zero_flag(&mut self, seq: u64, value: bool) {
        if self.zero_flag_seq.is_none_or(|last| seq > last) {
            self.zero_flag = value;
            self.zero_flag_seq = Some(seq);
        }
    }

    /// Read-only view of registers with their scoreboard validity.
    pub const fn register_view(&self) -> RegisterView<'_> {
        RegisterView::new(&self.regs, &self.scoreboard)
    }
}
