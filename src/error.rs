//! Error types for boostforge
//!
//! Domain-specific error types using thiserror.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use thiserror::Error;

/// Package metadata errors
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Metadata file could not be read
    #[error("Failed to read package data '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Metadata file could not be parsed
    #[error("Failed to parse package data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Package or library name is not a valid short name
    #[error("Invalid name '{name}' for package '{package}': expected lowercase [a-z0-9_]")]
    InvalidName { package: String, name: String },

    /// A package cannot both be a cycle group and belong to one
    #[error("Package '{package}' is declared as a cycle group and as a member of '{group}'")]
    ConflictingKind { package: String, group: String },
}

/// Dependency graph construction errors
#[derive(Error, Debug)]
pub enum GraphError {
    /// Dependency name has no corresponding package entry
    #[error("Dependency '{dependency}' required by '{package}' is not a known package")]
    MissingDependency { package: String, dependency: String },

    /// Member references a cycle group that does not exist
    #[error("Package '{package}' belongs to unknown cycle group '{group}'")]
    UnknownCycleGroup { package: String, group: String },

    /// Member references a package that is not declared as a cycle group
    #[error("Package '{package}' belongs to '{group}', which is not a cycle group")]
    NotACycleGroup { package: String, group: String },
}

/// Level scheduling errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// No zero-dependency package remains but the graph is not empty
    #[error(
        "Cyclic dependency detected: {} packages cannot be ordered ({})",
        residual.len(),
        render_residual(residual)
    )]
    CyclicDependency {
        /// The remaining package -> unresolved-deps mapping, for diagnosis
        residual: BTreeMap<String, BTreeSet<String>>,
    },
}

fn render_residual(residual: &BTreeMap<String, BTreeSet<String>>) -> String {
    residual
        .iter()
        .map(|(pkg, deps)| {
            let deps = deps.iter().cloned().collect::<Vec<_>>().join(", ");
            format!("{pkg} -> [{deps}]")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Source fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    Network { url: String, error: String },

    /// HTTP error status
    #[error("Download of '{url}' failed with HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Max retries exceeded
    #[error("Download failed after {retries} retries: {url}")]
    MaxRetriesExceeded { url: String, retries: u32 },

    /// Archive could not be unpacked
    #[error("Failed to unpack archive '{archive}': {error}")]
    Unpack { archive: PathBuf, error: String },

    /// IO error
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// External build tool errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Build tool could not be launched
    #[error("Failed to launch build tool `{command}`: {error}")]
    ToolSpawn { command: String, error: String },

    /// Build tool exited non-zero
    #[error("Build of '{library}' failed: `{command}` exited with status {status}")]
    ToolFailed {
        library: String,
        command: String,
        status: i32,
    },

    /// Build tool exceeded the configured timeout
    #[error("Build of '{library}' timed out after {seconds}s: `{command}`")]
    ToolTimeout {
        library: String,
        command: String,
        seconds: u64,
    },

    /// IO error while writing build descriptors
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },
}

/// Package info assembly errors
#[derive(Error, Debug)]
pub enum InfoError {
    /// Cycle group root is not known yet
    #[error("Cycle group '{group}' for package '{package}' has no resolved install root")]
    UnresolvedGroup { package: String, group: String },
}

/// Registry client errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Registry tool could not be launched
    #[error("Failed to launch registry tool `{command}`: {error}")]
    Spawn { command: String, error: String },

    /// Registry tool exited non-zero
    #[error("Registry command `{command}` exited with status {status}")]
    CommandFailed { command: String, status: i32 },
}

/// Top-level boostforge error type
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Metadata error
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Graph error
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Schedule error
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Build error
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Package info error
    #[error("Package info error: {0}")]
    Info(#[from] InfoError),

    /// Registry error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// IO error
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Generic error
    #[error("{0}")]
    Generic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dependency_reports_residual_graph() {
        let mut residual = BTreeMap::new();
        residual.insert(
            "a".to_string(),
            ["b".to_string()].into_iter().collect::<BTreeSet<_>>(),
        );
        residual.insert(
            "b".to_string(),
            ["a".to_string()].into_iter().collect::<BTreeSet<_>>(),
        );

        let err = ScheduleError::CyclicDependency { residual };
        let message = err.to_string();
        assert!(message.contains("2 packages"));
        assert!(message.contains("a -> [b]"));
        assert!(message.contains("b -> [a]"));
    }

    #[test]
    fn test_build_tool_error_carries_command_and_status() {
        let err = BuildError::ToolFailed {
            library: "regex".to_string(),
            command: "b2 -j4 regex-build".to_string(),
            status: 2,
        };
        let message = err.to_string();
        assert!(message.contains("regex"));
        assert!(message.contains("b2 -j4 regex-build"));
        assert!(message.contains("status 2"));
    }
}
