//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the APEX simulator. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived IPC/CPI.
//! 2. **Instruction mix:** Counts by category (ALU, multiply, load, store, branch, compare).
//! 3. **Stalls:** Data-hazard and structural stall cycles, and branch flushes.

use crate::isa::{OpClass, Opcode};

/// Simulation statistics structure tracking all performance metrics.
///
/// Every counter is driven by the logical clock only, so two runs of the same
/// program produce identical statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions that completed writeback.
    pub instructions_retired: u64,

    /// Count of ALU (arithmetic, logic, move) instructions retired.
    pub inst_alu: u64,
    /// Count of multiply instructions retired.
    pub inst_mul: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of conditional branches retired.
    pub inst_branch: u64,
    /// Count of compare instructions retired.
    pub inst_compare: u64,
    /// Count of `NOP`/`HALT` instructions retired.
    pub inst_other: u64,

    /// Cycles decode held an instruction back because a register was pending.
    pub stalls_data: u64,
    /// Cycles decode held an instruction back because its lane was busy.
    pub stalls_structural: u64,
    /// Taken branches that flushed the front end.
    pub flushes: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"stalls"`, `"instruction_mix"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "stalls", "instruction_mix"];

impl SimStats {
    /// Counts one retired instruction.
    pub const fn record_retire(&mut self, opcode: Opcode) {
        self.instructions_retired += 1;
        match opcode.class() {
            OpClass::Alu => self.inst_alu += 1,
            OpClass::Mul => self.inst_mul += 1,
            OpClass::Load => self.inst_load += 1,
            OpClass::Store => self.inst_store += 1,
            OpClass::Branch => self.inst_branch += 1,
            OpClass::Compare => self.inst_compare += 1,
            OpClass::Other => self.inst_other += 1,
        }
    }

    /// Instructions retired per cycle (0 before the first cycle).
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Cycles per retired instruction (0 before the first retirement).
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Renders the requested statistics sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to render every section.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, of: f64| (n as f64 / of) * 100.0;
        let mut out = Vec::new();

        out.push("==========================================================".to_string());
        out.push("APEX PIPELINE SIMULATION STATISTICS".to_string());
        out.push("==========================================================".to_string());
        if want("summary") {
            out.push(format!("sim_cycles               {}", self.cycles));
            out.push(format!("sim_insts                {}", self.instructions_retired));
            out.push(format!("sim_ipc                  {:.4}", self.ipc()));
            out.push(format!("sim_cpi                  {:.4}", self.cpi()));
            out.push("----------------------------------------------------------".to_string());
        }
        if want("stalls") {
            out.push("STALLS".to_string());
            out.push(format!(
                "  stalls.data            {} ({:.2}%)",
                self.stalls_data,
                pct(self.stalls_data, cyc)
            ));
            out.push(format!(
                "  stalls.structural      {} ({:.2}%)",
                self.stalls_structural,
                pct(self.stalls_structural, cyc)
            ));
            out.push(format!("  flushes                {}", self.flushes));
            out.push("----------------------------------------------------------".to_string());
        }
        if want("instruction_mix") {
            out.push("INSTRUCTION MIX".to_string());
            for (name, count) in [
                ("op.alu", self.inst_alu),
                ("op.mul", self.inst_mul),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.branch", self.inst_branch),
                ("op.compare", self.inst_compare),
                ("op.other", self.inst_other),
            ] {
                out.push(format!("  {name:<22} {count} ({:.2}%)", pct(count, instr)));
            }
        }
        out.push("==========================================================".to_string());
        out.join("\n")
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        println!("\n{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
