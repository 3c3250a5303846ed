//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod doctor;
pub mod plan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::defaults;
use crate::config::urls;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute and print the leveled build plan
    Plan {
        /// Boost version to plan for (develop, master, or X.Y.Z)
        version: String,

        /// Directory holding the package data files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },

    /// Build every package in dependency order and publish it to the registry
    Build {
        /// Boost version to build (develop, master, or X.Y.Z)
        version: String,

        /// Directory with the per-package working directories
        #[arg(long)]
        repo_dir: PathBuf,

        /// Directory holding the package data files
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,

        /// Number of parallel build jobs
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Build tool debug level (-d+N)
        #[arg(long, env = "FORGE_B2_DEBUG", default_value_t = defaults::DEFAULT_B2_DEBUG_LEVEL)]
        debug_level: u32,

        /// MPI binary directory prepended to the build tool's PATH
        #[arg(long, env = "MPI_BIN")]
        mpi_bin: Option<PathBuf>,

        /// Registry channel to create packages under
        #[arg(long, default_value = defaults::DEFAULT_CHANNEL)]
        channel: String,

        /// Source host to fetch library archives from
        #[arg(long, default_value = urls::SOURCE_HOST)]
        host_base: String,

        /// Abort a build tool invocation after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Skip the registry cleanup that precedes the run
        #[arg(long)]
        skip_registry_clean: bool,
    },

    /// Check that the required external tools are available
    Doctor,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, json: bool) -> Result<()> {
        match self {
            Commands::Plan { version, data_dir } => plan::execute(&plan::PlanOptions {
                version,
                data_dir,
                json,
            }),
            Commands::Build {
                version,
                repo_dir,
                data_dir,
                jobs,
                debug_level,
                mpi_bin,
                channel,
                host_base,
                timeout_secs,
                skip_registry_clean,
            } => {
                build::execute(build::BuildOptions {
                    version,
                    repo_dir,
                    data_dir,
                    jobs,
                    debug_level,
                    mpi_bin,
                    channel,
                    host_base,
                    timeout_secs,
                    skip_registry_clean,
                })
                .await
            }
            Commands::Doctor => doctor::execute(),
        }
    }
}

/// Map a user-facing version to its archive/data label, validating release
/// versions as semver.
pub fn resolve_label(version: &str) -> Result<String> {
    if version != "develop" && version != "master" {
        semver::Version::parse(version)
            .with_context(|| format!("'{version}' is not develop, master, or a release version"))?;
    }
    Ok(urls::version_label(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_label_accepts_branches_and_releases() {
        assert_eq!(resolve_label("develop").expect("label"), "develop");
        assert_eq!(resolve_label("master").expect("label"), "master");
        assert_eq!(resolve_label("1.69.0").expect("label"), "boost-1.69.0");
    }

    #[test]
    fn test_resolve_label_rejects_garbage() {
        assert!(resolve_label("not-a-version").is_err());
        assert!(resolve_label("1.69").is_err());
    }
}
