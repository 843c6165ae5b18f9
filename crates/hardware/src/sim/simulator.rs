//! Simulator: owns both the CPU and the pipeline side-by-side.
//!
//! The `Simulator` is the public driver API. It validates the configuration,
//! builds the architectural state and the pipeline, and steps them one
//! logical clock tick at a time while tracking whether the run has halted or
//! faulted.

use std::fmt;

use tracing::{debug, info};

use crate::common::{Fault, InitError, RegisterView};
use crate::config::Config;
use crate::core::Cpu;
use crate::core::pipeline::engine::{Pipeline, TickOutcome};
use crate::core::pipeline::traits::{NullSink, TraceSink};
use crate::isa::Instruction;
use crate::stats::SimStats;

/// Why a run ended normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HaltReason {
    /// A `HALT` instruction retired.
    HaltRetired,
    /// Fetch ran past the last instruction and the pipeline drained.
    ProgramExhausted,
}

/// Lifecycle state of a simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// Ticks still advance the pipeline.
    Running,
    /// The program finished; further ticks do nothing.
    Halted(HaltReason),
    /// An instruction faulted; further ticks report the same fault.
    Faulted(Fault),
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickResult {
    /// The simulation has halted (this tick or earlier).
    pub halted: bool,
}

/// Top-level simulator: CPU architectural state + pipeline.
pub struct Simulator {
    /// CPU architectural state (registers, scoreboard, memories, stats).
    pub cpu: Cpu,
    /// Pipeline latches and lanes.
    pub pipeline: Pipeline,
    status: Status,
    sink: Box<dyn TraceSink>,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("cpu", &self.cpu)
            .field("pipeline", &self.pipeline)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Creates a simulator ready to run `program`.
    ///
    /// # Errors
    ///
    /// [`InitError::EmptyProgram`] for an empty program and
    /// [`InitError::InvalidConfig`] when `config` fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use apexsim_core::{Config, Instruction, Opcode, Simulator};
    ///
    /// let program = vec![
    ///     Instruction::movc(1, 5),
    ///     Instruction::movc(2, 10),
    ///     Instruction::reg_reg_reg(Opcode::Add, 3, 1, 2),
    ///     Instruction::new(Opcode::Halt),
    /// ];
    /// let mut sim = Simulator::initialize(program, &Config::default()).unwrap();
    /// sim.run(1_000).unwrap();
    ///
    /// assert!(sim.is_halted());
    /// assert_eq!(sim.register_file().value(3), 15);
    /// assert_eq!(sim.cycles(), 8);
    /// ```
    pub fn initialize(program: Vec<Instruction>, config: &Config) -> Result<Self, InitError> {
        if program.is_empty() {
            return Err(InitError::EmptyProgram);
        }
        config.validate()?;
        debug!(
            instructions = program.len(),
            base_pc = config.general.base_pc,
            topology = ?config.pipeline.topology,
            "simulator initialized"
        );
        Ok(Self {
            cpu: Cpu::new(program, config),
            pipeline: Pipeline::new(&config.pipeline),
            status: Status::Running,
            sink: Box::new(NullSink),
        })
    }

    /// Replaces the stage trace sink, builder style.
    #[must_use]
    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replaces the stage trace sink.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = sink;
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// Ticking a halted simulator does nothing and reports `halted: true`.
    ///
    /// # Errors
    ///
    /// The [`Fault`] raised this tick, or the one that stopped the run earlier.
    pub fn tick(&mut self) -> Result<TickResult, Fault> {
        match &self.status {
            Status::Halted(_) => return Ok(TickResult { halted: true }),
            Status::Faulted(fault) => return Err(fault.clone()),
            Status::Running => {}
        }

        match self.pipeline.tick(&mut self.cpu, self.sink.as_mut()) {
            Ok(TickOutcome::Running) => Ok(TickResult { halted: false }),
            Ok(TickOutcome::HaltRetired) => Ok(self.halt(HaltReason::HaltRetired)),
            Ok(TickOutcome::ProgramExhausted) => Ok(self.halt(HaltReason::ProgramExhausted)),
            Err(fault) => {
                self.status = Status::Faulted(fault.clone());
                Err(fault)
            }
        }
    }

    fn halt(&mut self, reason: HaltReason) -> TickResult {
        info!(
            ?reason,
            cycles = self.cpu.stats.cycles,
            retired = self.cpu.stats.instructions_retired,
            "simulation halted"
        );
        self.status = Status::Halted(reason);
        TickResult { halted: true }
    }

    /// Ticks until the simulation halts or `max_cycles` more ticks have run.
    ///
    /// # Returns
    ///
    /// Whether the simulation has halted.
    ///
    /// # Errors
    ///
    /// The first [`Fault`] raised.
    pub fn run(&mut self, max_cycles: u64) -> Result<TickResult, Fault> {
        for _ in 0..max_cycles {
            if self.tick()?.halted {
                break;
            }
        }
        if let Status::Faulted(fault) = &self.status {
            return Err(fault.clone());
        }
        Ok(TickResult {
            halted: self.is_halted(),
        })
    }

    /// Whether the simulation has halted normally.
    pub const fn is_halted(&self) -> bool {
        matches!(self.status, Status::Halted(_))
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> &Status {
        &self.status
    }

    /// Why the simulation halted, if it has.
    pub const fn halt_reason(&self) -> Option<HaltReason> {
        match self.status {
            Status::Halted(reason) => Some(reason),
            _ => None,
        }
    }

    /// Registers with their scoreboard validity.
    pub const fn register_file(&self) -> RegisterView<'_> {
        self.cpu.register_view()
    }

    /// Data memory, word-indexed.
    pub fn data_memory(&self) -> &[i32] {
        self.cpu.memory.as_slice()
    }

    /// Performance counters.
    pub const fn stats(&self) -> &SimStats {
        &self.cpu.stats
    }

    /// Cycles elapsed so far.
    pub const fn cycles(&self) -> u64 {
        self.cpu.stats.cycles
    }

    /// Address of the next instruction to fetch.
    pub const fn pc(&self) -> u32 {
        self.cpu.pc
    }

    /// The zero flag.
    pub const fn zero_flag(&self) -> bool {
        self.cpu.zero_flag
    }
}
