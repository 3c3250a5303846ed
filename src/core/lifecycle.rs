//! Three-phase lifecycle driver
//!
//! Runs `pre`, `do`, and `post` as three full sweeps over the whole group
//! sequence, so global pre-steps finish before any build starts and global
//! post-steps only run after every build finished. A failure on any package
//! aborts the run immediately, attributed to the failing phase and package.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::schedule::Group;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Preparation sweep, runs for every package
    Pre,
    /// Build sweep
    Do,
    /// Metadata/publication sweep
    Post,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Pre => write!(f, "pre"),
            Phase::Do => write!(f, "do"),
            Phase::Post => write!(f, "post"),
        }
    }
}

/// Per-package phase hooks invoked by the driver
#[allow(async_fn_in_trait)]
pub trait PackageHooks {
    /// Error type surfaced by the hooks
    type Error: std::error::Error + Send + Sync + 'static;

    /// Preparation step for one package
    async fn pre(&mut self, package: &str) -> Result<(), Self::Error>;

    /// Build step for one package
    async fn run(&mut self, package: &str) -> Result<(), Self::Error>;

    /// Post-build step for one package
    async fn post(&mut self, package: &str) -> Result<(), Self::Error>;
}

/// A phase failure, attributed to the package that caused it
#[derive(Error, Debug)]
#[error("{phase} phase failed for package '{package}': {source}")]
pub struct LifecycleError<E: std::error::Error + 'static> {
    /// Phase the failure happened in
    pub phase: Phase,
    /// Package the failure happened on
    pub package: String,
    /// Underlying cause
    #[source]
    pub source: E,
}

/// Drives the lifecycle over an ordered group sequence
#[derive(Debug)]
pub struct Lifecycle {
    workdir: PathBuf,
}

impl Lifecycle {
    /// Create a driver rooted at the directory holding per-package workdirs
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Directory a package materializes into
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.workdir.join(package)
    }

    /// Run all three sweeps over the group sequence.
    ///
    /// Packages without a materialized working directory are skipped for
    /// `do`/`post`; `pre` always runs.
    pub async fn run<H: PackageHooks>(
        &self,
        groups: &[Group],
        hooks: &mut H,
    ) -> Result<(), LifecycleError<H::Error>> {
        for phase in [Phase::Pre, Phase::Do, Phase::Post] {
            for group in groups {
                for package in group {
                    if phase != Phase::Pre && !self.package_dir(package).is_dir() {
                        tracing::debug!("{package}: not materialized, skipping {phase} phase");
                        continue;
                    }
                    let result = match phase {
                        Phase::Pre => hooks.pre(package).await,
                        Phase::Do => hooks.run(package).await,
                        Phase::Post => hooks.post(package).await,
                    };
                    result.map_err(|source| LifecycleError {
                        phase,
                        package: package.clone(),
                        source,
                    })?;
                }
            }
        }
        Ok(())
    }
}
