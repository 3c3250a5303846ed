//! Boostforge - dependency-ordered build orchestrator for modular Boost packages
//!
//! This library turns a package metadata file into a leveled build plan and
//! drives every package through a three-phase lifecycle (fetch + build +
//! publish metadata), special-casing cycle groups that can only be built as
//! one atomic unit.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Business logic: graph building, level scheduling, lifecycle
//!   driving, and the per-package build unit
//! - [`registry`] - Package registry client (wraps the external registry tool)
//! - [`infra`] - Infrastructure layer (network, external processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;
pub mod registry;
