//! Execution units and functional components.
//!
//! This module contains the datapaths used by the functional-unit lanes:
//! the integer ALU (also used by the multiplier lane), the branch resolution
//! unit, and the load/store address unit.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Branch Resolution Unit.
pub mod bru;

/// Load/Store Unit for memory address generation.
pub mod lsu;
