//! Simulation driver and program loading.
//!
//! Provides the APEX assembly loader and the top-level `Simulator` that
//! steps the pipeline and reports its state.

/// APEX assembly loader.
pub mod loader;

/// Top-level simulator API.
pub mod simulator;
