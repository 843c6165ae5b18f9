//! # Configuration Tests
//!
//! Tests for configuration structures, JSON deserialization, defaults, and
//! validation.

use std::io::Write;

use apexsim_core::Simulator;
use apexsim_core::common::{InitError, LoadError};
use apexsim_core::config::*;
use apexsim_core::isa::{Instruction, Opcode};
use tempfile::NamedTempFile;

fn halt_only() -> Vec<Instruction> {
    vec![Instruction::new(Opcode::Halt)]
}

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace);
    assert_eq!(config.general.base_pc, 4000);
    assert_eq!(config.memory.data_memory_words, 4096);
    assert_eq!(config.pipeline.topology, Topology::Split);
    assert!(!config.pipeline.memory_stage);
    assert_eq!(config.pipeline.multiply_latency, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unified_preset() {
    let pipeline = PipelineConfig::unified();
    assert_eq!(pipeline.topology, Topology::Unified);
    assert!(pipeline.memory_stage);
    assert_eq!(pipeline.multiply_latency, 1);
}

#[test]
fn test_empty_json_gives_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_json(r#"{ "pipeline": { "multiply_latency": 4 } }"#).unwrap();
    assert_eq!(config.pipeline.multiply_latency, 4);
    assert_eq!(config.pipeline.topology, Topology::Split);
    assert_eq!(config.general.base_pc, 4000);
}

#[test]
fn test_full_json() {
    let json = r#"{
        "general": { "trace": true, "base_pc": 1000 },
        "memory": { "data_memory_words": 128 },
        "pipeline": { "topology": "Unified", "memory_stage": true, "multiply_latency": 2 }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert!(config.general.trace);
    assert_eq!(config.general.base_pc, 1000);
    assert_eq!(config.memory.data_memory_words, 128);
    assert_eq!(config.pipeline.topology, Topology::Unified);
    assert_eq!(config.pipeline.multiply_latency, 2);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unknown_topology_rejected() {
    assert!(Config::from_json(r#"{ "pipeline": { "topology": "Superscalar" } }"#).is_err());
}

// ══════════════════════════════════════════════════════════
// Validation
// ══════════════════════════════════════════════════════════

#[test]
fn test_zero_memory_invalid() {
    let mut config = Config::default();
    config.memory.data_memory_words = 0;
    assert!(matches!(config.validate(), Err(InitError::InvalidConfig(_))));
}

#[test]
fn test_zero_multiply_latency_invalid() {
    let mut config = Config::default();
    config.pipeline.multiply_latency = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("multiply_latency"), "{err}");
}

#[test]
fn test_unified_without_memory_stage_invalid() {
    let mut config = Config::default();
    config.pipeline.topology = Topology::Unified;
    config.pipeline.memory_stage = false;
    assert!(matches!(config.validate(), Err(InitError::InvalidConfig(_))));
}

#[test]
fn test_misaligned_base_pc_invalid() {
    let mut config = Config::default();
    config.general.base_pc = 4002;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("4002"), "{err}");
}

#[test]
fn test_initialize_rejects_invalid_config() {
    let mut config = Config::default();
    config.memory.data_memory_words = 0;
    let err = Simulator::initialize(halt_only(), &config).unwrap_err();
    assert!(matches!(err, InitError::InvalidConfig(_)));
}

#[test]
fn test_custom_base_pc_moves_program() {
    let mut config = Config::default();
    config.general.base_pc = 100;
    let mut sim = Simulator::initialize(halt_only(), &config).unwrap();
    assert_eq!(sim.pc(), 100);
    let _ = sim.run(10).unwrap();
    assert!(sim.is_halted());
}

// ══════════════════════════════════════════════════════════
// Files
// ══════════════════════════════════════════════════════════

#[test]
fn test_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "pipeline": { "memory_stage": true } }"#)
        .unwrap();
    file.flush().unwrap();

    let config = Config::from_json_file(file.path()).unwrap();
    assert!(config.pipeline.memory_stage);
}

#[test]
fn test_from_json_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_from_json_file_malformed_reports_line() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{\n  \"general\": {\n    \"trace\": maybe\n  }\n}")
        .unwrap();
    file.flush().unwrap();

    let err = Config::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { line: 3, .. }), "{err}");
}
