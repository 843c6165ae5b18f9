//! Pipeline stage implementations.
//!
//! This module contains the individual implementations for the stages of the
//! instruction pipeline. It includes:
//! 1. **Fetch:** Retrieves instructions from code memory based on the PC.
//! 2. **Decode:** Checks hazards, reads operands, and dispatches to a lane.
//! 3. **Execute:** Advances the functional-unit lanes and resolves branches.
//! 4. **Memory:** Performs load reads when a separate memory stage is configured.
//! 5. **Writeback:** Commits results and stores and retires instructions.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;
