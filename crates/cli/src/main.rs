//! APEX pipeline simulator CLI.
//!
//! This binary loads an APEX assembly program and runs it on the simulated
//! pipeline. It supports:
//! 1. **Run:** Execute to completion with per-cycle stage output, optionally single-stepping (`--step`).
//! 2. **Simulate:** Run a number of cycles with stage output, then single-step.
//! 3. **Display:** Run a number of cycles with stage output, then stop.
//! 4. **Show-mem:** Run a number of cycles silently and dump the final state.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use apexsim_core::common::Fault;
use apexsim_core::common::constants::MEMORY_DUMP_WORDS;
use apexsim_core::config::Config;
use apexsim_core::core::pipeline::{StageId, StageSnapshot, TraceSink};
use apexsim_core::isa::disasm;
use apexsim_core::sim::loader;
use apexsim_core::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "apexsim",
    author,
    version,
    about = "Cycle-accurate APEX pipeline simulator",
    long_about = "Run an APEX assembly program on the in-order APEX pipeline.\n\nWithout a subcommand the program runs to completion, printing every stage each cycle.\n\nExamples:\n  apexsim programs/sum.asm\n  apexsim programs/sum.asm --step\n  apexsim programs/sum.asm simulate 10\n  apexsim programs/sum.asm display 25 --config unified.json\n  apexsim programs/sum.asm show-mem 40"
)]
struct Cli {
    /// APEX assembly program to load.
    program: PathBuf,

    /// JSON configuration file (defaults are used for missing keys).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every stage event and every retired instruction.
    #[arg(long)]
    trace: bool,

    /// Prompt before each cycle (Enter advances, `q` quits).
    #[arg(long)]
    step: bool,

    /// Cycle limit for a run without a subcommand.
    #[arg(long, default_value_t = 1_000_000)]
    max_cycles: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Run CYCLES cycles printing stage contents, then single-step.
    Simulate {
        /// Cycles to run before single-stepping.
        cycles: u64,
    },

    /// Run CYCLES cycles printing stage contents, then stop.
    Display {
        /// Cycles to run.
        cycles: u64,
    },

    /// Run CYCLES cycles silently, then dump registers and memory.
    ShowMem {
        /// Cycles to run.
        cycles: u64,
    },
}

/// What the driver does with the simulator.
#[derive(Debug, Clone, Copy)]
struct Plan {
    cycles: u64,
    echo: bool,
    step_first: bool,
    step_after: bool,
}

impl Plan {
    const fn new(command: Option<Commands>, step: bool, max_cycles: u64) -> Self {
        match command {
            None => Self {
                cycles: max_cycles,
                echo: true,
                step_first: step,
                step_after: false,
            },
            Some(Commands::Simulate { cycles }) => Self {
                cycles,
                echo: true,
                step_first: false,
                step_after: true,
            },
            Some(Commands::Display { cycles }) => Self {
                cycles,
                echo: true,
                step_first: false,
                step_after: false,
            },
            Some(Commands::ShowMem { cycles }) => Self {
                cycles,
                echo: false,
                step_first: false,
                step_after: false,
            },
        }
    }
}

/// Why a stretch of cycles ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Halted,
    Quit,
    Budget,
}

/// Prints every stage snapshot under a per-cycle header.
#[derive(Debug, Default)]
struct StageEcho;

impl TraceSink for StageEcho {
    fn on_stage(&mut self, snapshot: &StageSnapshot) {
        if snapshot.stage == StageId::Writeback {
            println!("--------------------------------------------");
            println!("Clock Cycle #: {}", snapshot.cycle);
            println!("--------------------------------------------");
        }
        println!("{snapshot}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    let mut config = load_config(cli.config.as_deref());
    config.general.trace |= cli.trace;

    let program = loader::load_program(&cli.program).unwrap_or_else(|e| fail(&e));
    println!(
        "[*] Loaded {} ({} instructions)",
        cli.program.display(),
        program.len()
    );
    for line in disasm::listing(config.general.base_pc, &program) {
        println!("    {line}");
    }
    println!();

    let mut sim = Simulator::initialize(program, &config).unwrap_or_else(|e| fail(&e));
    let plan = Plan::new(cli.command, cli.step, cli.max_cycles);
    debug!(?plan, "starting run");
    if plan.echo {
        sim.set_trace_sink(Box::new(StageEcho));
    }

    if let Err(fault) = execute(&mut sim, &plan) {
        eprintln!("\n[!] FAULT: {fault}");
        report(&sim);
        let _ = io::stdout().flush();
        process::exit(1);
    }
    report(&sim);
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--trace` selects `trace` and the
/// default is `warn`.
fn init_tracing(trace: bool) {
    let fallback = if trace { "trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Config {
    path.map_or_else(Config::default, |p| {
        Config::from_json_file(p).unwrap_or_else(|e| fail(&e))
    })
}

fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("Error: {err}");
    process::exit(1);
}

/// Runs the plan's cycles, then the single-step tail if the plan asks for one.
fn execute(sim: &mut Simulator, plan: &Plan) -> Result<(), Fault> {
    let flow = advance(sim, plan.cycles, plan.echo, plan.step_first)?;
    if flow == Flow::Budget && plan.step_after {
        let _ = advance(sim, u64::MAX, plan.echo, true)?;
    }
    Ok(())
}

/// Ticks up to `cycles` times, stopping early on halt or when the user quits.
fn advance(sim: &mut Simulator, cycles: u64, echo: bool, prompt: bool) -> Result<Flow, Fault> {
    for _ in 0..cycles {
        let halted = sim.tick()?.halted;
        if echo {
            print_register_line(sim);
        }
        if halted {
            return Ok(Flow::Halted);
        }
        if prompt && !prompt_continue() {
            return Ok(Flow::Quit);
        }
    }
    Ok(Flow::Budget)
}

/// Waits for the user; `false` on `q`, end of input, or a read error.
fn prompt_continue() -> bool {
    print!("Press Enter to advance the clock or <q> to quit: ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => false,
        Ok(_) => !line.trim().eq_ignore_ascii_case("q"),
    }
}

fn print_register_line(sim: &Simulator) {
    let regs: Vec<String> = sim
        .register_file()
        .iter()
        .map(|(i, value, _)| format!("R{i:<3}[{value:<3}]"))
        .collect();
    println!("----------\nRegisters:\n----------");
    for row in regs.chunks(8) {
        println!("{}", row.join(" "));
    }
}

fn report(sim: &Simulator) {
    let stats = sim.stats();
    let verdict = if sim.is_halted() { "Complete" } else { "Stopped" };
    println!(
        "\nAPEX_CPU: Simulation {verdict}, cycles = {} instructions = {}",
        stats.cycles, stats.instructions_retired
    );

    println!("\n================== STATE OF ARCHITECTURAL REGISTER FILE ================");
    for (idx, value, valid) in sim.register_file().iter() {
        let status = if valid { "VALID" } else { "INVALID" };
        println!("|   REG[{idx:>2}]   |   Value = {value:<11} |   Status = {status:<7} |");
    }

    println!("\n================ STATE OF DATA MEMORY ================");
    for (addr, word) in sim.data_memory().iter().take(MEMORY_DUMP_WORDS).enumerate() {
        println!("|   MEM[{addr:>2}]   |   Data Value = {word:<11} |");
    }

    stats.print();
}
