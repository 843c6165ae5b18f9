//! # Unit Components
//!
//! This module serves as the central hub for the simulator tests. It organizes
//! them by the component they exercise, from configuration and loading up to
//! whole-program pipeline scenarios.

/// Tests for configuration defaults, JSON parsing, and validation.
pub mod config;



/// End-to-end program scenarios with exact cycle counts.
pub mod scenarios;
