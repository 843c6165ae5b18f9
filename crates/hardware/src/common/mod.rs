//! Common utilities and types used throughout the APEX simulator.
//!
//! This module provides building blocks shared across all components of the
//! simulator. It includes:
//! 1. **Constants:** Register-file size, instruction width, and dump limits.
//! 2. **Error Handling:** Runtime faults and initialization/load errors.
//! 3. **Register Management:** The architectural register file and its read-only view.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types and fault definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use constants::{INSTRUCTION_SIZE, REG_FILE_SIZE};
pub use error::{Fault, FaultKind, InitError, LoadError};
pub use reg::{RegisterFile, RegisterView};
