//! Core business logic module
//!
//! This module contains the orchestration logic for boostforge.
//! External effects (network, processes) are reached only through the
//! [`crate::core::build`] trait seams, implemented in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`metadata`] - Package metadata loading and validation
//! - [`graph`] - Dependency graph construction (with cycle-group collapsing)
//! - [`schedule`] - Level scheduling (Kahn-style leveling into groups)
//! - [`lifecycle`] - Three-phase lifecycle driver over the group sequence
//! - [`build`] - Per-package build unit (fetch, header-only vs. compiled)
//! - [`jam`] - Generated jamroot.jam descriptor statements
//! - [`info`] - Usage metadata assembly and package identity

pub mod build;
pub mod graph;
pub mod info;
pub mod jam;
pub mod lifecycle;
pub mod metadata;
pub mod schedule;
