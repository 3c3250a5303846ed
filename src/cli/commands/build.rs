//! Build command implementation
//!
//! The top-level "build everything" driver: clears the family's registry
//! entries, computes the leveled plan, and drives every package through the
//! fetch/build/publish lifecycle in dependency order.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::ProgressBar;

use crate::cli::commands::resolve_label;
use crate::cli::output;
use crate::config::{defaults, urls};
use crate::core::build::{BuildConfig, BuildUnit};
use crate::core::graph::build_graph;
use crate::core::info::{collect_package_info, GroupRoots, PackageInfo};
use crate::core::lifecycle::{Lifecycle, PackageHooks};
use crate::core::metadata::{PackageKind, PackageSet};
use crate::core::schedule::schedule;
use crate::error::ForgeError;
use crate::infra::fetch::GithubSourceHost;
use crate::infra::toolchain::ProcessBuildTool;
use crate::registry::RegistryClient;

/// Build options
pub struct BuildOptions {
    /// Boost version (`develop`, `master`, or a release version)
    pub version: String,
    /// Directory with the per-package working directories
    pub repo_dir: PathBuf,
    /// Directory holding the package data files
    pub data_dir: PathBuf,
    /// Parallel jobs for the build tool
    pub jobs: Option<usize>,
    /// Build tool debug level
    pub debug_level: u32,
    /// MPI binary directory prepended to the build tool's PATH
    pub mpi_bin: Option<PathBuf>,
    /// Registry channel packages are created under
    pub channel: String,
    /// Source host archives are fetched from
    pub host_base: String,
    /// Build tool timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Skip the registry cleanup that precedes the run
    pub skip_registry_clean: bool,
}

/// Lifecycle hooks wiring the build unit, registry, and metadata assembly
struct ForgeHooks<'a> {
    packages: &'a PackageSet,
    config: &'a BuildConfig,
    host: &'a GithubSourceHost,
    tool: &'a ProcessBuildTool,
    registry: &'a RegistryClient,
    channel: &'a str,
    repo_dir: PathBuf,
    group_roots: GroupRoots,
    infos: BTreeMap<String, PackageInfo>,
    bar: ProgressBar,
}

impl PackageHooks for ForgeHooks<'_> {
    type Error = ForgeError;

    async fn pre(&mut self, package: &str) -> Result<(), Self::Error> {
        // Global registry cleanup already ran; per-package preparation is a
        // placeholder for driver subclass behavior.
        tracing::debug!("{package}: pre");
        Ok(())
    }

    async fn run(&mut self, package: &str) -> Result<(), Self::Error> {
        let Some(pkg) = self.packages.get(package) else {
            // Synthetic foundation nodes have nothing to build.
            tracing::debug!("{package}: foundation node, nothing to build");
            return Ok(());
        };
        self.bar.set_message(package.to_string());

        let workdir = self.repo_dir.join(package);
        let unit = BuildUnit::new(pkg, self.config, self.host, self.tool, &workdir);
        unit.fetch_source().await?;
        let report = unit.build().await?;
        for (lib, names) in &report.libraries {
            tracing::info!("{package}/{lib}: collected {names:?}");
        }

        if pkg.kind == PackageKind::CycleGroup {
            self.group_roots.insert(package.to_string(), workdir.clone());
        }
        self.registry.create(&workdir, self.channel, &[]).await?;
        self.bar.inc(1);
        Ok(())
    }

    async fn post(&mut self, package: &str) -> Result<(), Self::Error> {
        let Some(pkg) = self.packages.get(package) else {
            return Ok(());
        };
        let workdir = self.repo_dir.join(package);
        let info = collect_package_info(pkg, &workdir, &self.group_roots)?;
        self.infos.insert(package.to_string(), info);
        Ok(())
    }
}

/// Execute the build command
pub async fn execute(options: BuildOptions) -> Result<()> {
    let label = resolve_label(&options.version)?;
    let data_file = options.data_dir.join(urls::package_data_file(&label));
    let packages = PackageSet::load(&data_file)
        .with_context(|| format!("Failed to load package data from {}", data_file.display()))?;

    let graph = build_graph(&packages)?;
    let groups = schedule(graph)?;
    tracing::info!(
        "Building {} packages in {} groups for {label}",
        packages.len(),
        groups.len()
    );

    let registry = RegistryClient::default();
    if options.skip_registry_clean {
        tracing::info!("Skipping registry cleanup (--skip-registry-clean)");
    } else {
        registry
            .remove(defaults::FAMILY_REGISTRY_PATTERN)
            .await
            .context("Registry cleanup failed")?;
    }

    let config = BuildConfig {
        jobs: options.jobs.unwrap_or_else(num_cpus::get),
        debug_level: options.debug_level,
        mpi_bin: options.mpi_bin.clone(),
    };
    let host = GithubSourceHost::new(&options.host_base, &label);
    let mut tool = ProcessBuildTool::default();
    if let Some(secs) = options.timeout_secs {
        tool = tool.with_timeout(Duration::from_secs(secs));
    }

    let bar = output::create_build_bar(packages.len() as u64);
    let mut hooks = ForgeHooks {
        packages: &packages,
        config: &config,
        host: &host,
        tool: &tool,
        registry: &registry,
        channel: &options.channel,
        repo_dir: options.repo_dir.clone(),
        group_roots: GroupRoots::new(),
        infos: BTreeMap::new(),
        bar: bar.clone(),
    };

    Lifecycle::new(&options.repo_dir)
        .run(&groups, &mut hooks)
        .await?;

    bar.finish_and_clear();
    let total_libs: usize = hooks.infos.values().map(|info| info.libs.len()).sum();
    println!(
        "{} built {} packages ({} linkable libraries) for {label}",
        output::status::SUCCESS,
        hooks.infos.len(),
        total_libs
    );
    Ok(())
}
