//! Configuration system for the APEX simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline constants (load address, data-memory size, latencies).
//! 2. **Structures:** Hierarchical config for general, memory, and pipeline settings.
//! 3. **Enums:** Pipeline topology selection.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or use `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::INSTRUCTION_SIZE;
use crate::common::error::{InitError, LoadError};

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    /// Address of the first instruction.
    ///
    /// Code memory is indexed by `(pc - BASE_PC) / 4`.
    pub const BASE_PC: u32 = 4000;

    /// Number of 32-bit words of data memory.
    pub const DATA_MEMORY_WORDS: usize = 4096;

    /// Cycles a multiply occupies its lane.
    ///
    /// One cycle matches the reference pipeline, whose multi-cycle counter
    /// was never wired in.
    pub const MULTIPLY_LATENCY: u32 = 1;
}

/// Shape of the execute portion of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Topology {
    /// Separate Integer, Multiply, and Load/Store lanes.
    ///
    /// Decode dispatches each instruction to the lane for its opcode class;
    /// each lane holds one instruction at a time.
    #[default]
    Split,
    /// One execute lane shared by every opcode, followed by a memory stage.
    Unified,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use apexsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.general.base_pc, 4000);
/// assert_eq!(config.memory.data_memory_words, 4096);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use apexsim_core::config::{Config, Topology};
///
/// let json = r#"{
///     "general": { "trace": true },
///     "pipeline": { "topology": "Unified", "memory_stage": true, "multiply_latency": 3 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace);
/// assert_eq!(config.pipeline.topology, Topology::Unified);
/// assert_eq!(config.pipeline.multiply_latency, 3);
/// assert_eq!(config.memory.data_memory_words, 4096);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Data memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Pipeline shape and latencies
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the text is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] when the file cannot be read and
    /// [`LoadError::Parse`] (line reported by `serde_json`) when it is malformed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|e| LoadError::Parse {
            line: e.line(),
            message: e.to_string(),
        })
    }

    /// Checks the configuration for combinations the pipeline cannot model.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<(), InitError> {
        if self.memory.data_memory_words == 0 {
            return Err(InitError::InvalidConfig(
                "memory.data_memory_words must be non-zero".to_string(),
            ));
        }
        if self.pipeline.multiply_latency == 0 {
            return Err(InitError::InvalidConfig(
                "pipeline.multiply_latency must be at least 1".to_string(),
            ));
        }
        if self.pipeline.topology == Topology::Unified && !self.pipeline.memory_stage {
            return Err(InitError::InvalidConfig(
                "the Unified topology requires pipeline.memory_stage".to_string(),
            ));
        }
        if self.general.base_pc % INSTRUCTION_SIZE != 0 {
            return Err(InitError::InvalidConfig(format!(
                "general.base_pc {} is not instruction aligned",
                self.general.base_pc
            )));
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Emit a commit log line for every retired instruction
    #[serde(default)]
    pub trace: bool,

    /// Address of the first instruction
    #[serde(default = "GeneralConfig::default_base_pc")]
    pub base_pc: u32,
}

impl GeneralConfig {
    /// Returns the default load address.
    fn default_base_pc() -> u32 {
        defaults::BASE_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            base_pc: defaults::BASE_PC,
        }
    }
}

/// Data memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Data memory size in 32-bit words
    #[serde(default = "MemoryConfig::default_words")]
    pub data_memory_words: usize,
}

impl MemoryConfig {
    /// Returns the default data-memory size in words.
    fn default_words() -> usize {
        defaults::DATA_MEMORY_WORDS
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_memory_words: defaults::DATA_MEMORY_WORDS,
        }
    }
}

/// Pipeline shape configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Split lanes or a single unified execute lane
    #[serde(default)]
    pub topology: Topology,

    /// Insert a memory stage between execute and writeback
    #[serde(default)]
    pub memory_stage: bool,

    /// Cycles a multiply occupies its lane
    #[serde(default = "PipelineConfig::default_multiply_latency")]
    pub multiply_latency: u32,
}

impl PipelineConfig {
    /// Returns the default multiply latency in cycles.
    fn default_multiply_latency() -> u32 {
        defaults::MULTIPLY_LATENCY
    }

    /// The unified five-stage shape: one execute lane plus a memory stage.
    pub fn unified() -> Self {
        Self {
            topology: Topology::Unified,
            memory_stage: true,
            ..Self::default()
        }
    }
}

impl Default for PipelineConfig {
    /// Creates the default pipeline: split lanes, no memory stage,
    /// single-cycle multiply.
    fn default() -> Self {
        Self {
            topology: Topology::Split,
            memory_stage: false,
            multiply_latency: defaults::MULTIPLY_LATENCY,
        }
    }
}
