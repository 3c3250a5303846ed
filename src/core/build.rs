//! Per-package build unit
//!
//! Fetches library sources and either synthesizes a header-only descriptor
//! or drives the external build tool, then collects the produced binary
//! artifacts and appends their linkage declarations to the descriptor.
//!
//! Network and process effects go through the [`SourceHost`] and
//! [`BuildTool`] seams so the unit stays testable without either.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::jam;
use crate::core::metadata::{Package, PackageKind};
use crate::error::{BuildError, FetchError};

/// Fetches one library's source archive and materializes it under
/// `destination/<library>`.
#[allow(async_fn_in_trait)]
pub trait SourceHost {
    /// Fetch and unpack one library archive
    async fn fetch_archive(&self, library: &str, destination: &Path) -> Result<(), FetchError>;
}

/// Runs the external build tool
#[allow(async_fn_in_trait)]
pub trait BuildTool {
    /// Run the tool with `args` in `cwd`, with `env` overrides applied
    async fn run(
        &self,
        library: &str,
        args: &[String],
        cwd: &Path,
        env: &[(String, String)],
    ) -> Result<(), BuildError>;
}

/// Explicit build configuration with documented defaults
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Parallel jobs passed to the build tool (`-jN`), defaults to the
    /// host CPU count
    pub jobs: usize,
    /// Build tool debug level (`-d+N`), defaults to 1
    pub debug_level: u32,
    /// Directory holding the MPI binaries, prepended to `PATH` when set
    pub mpi_bin: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            jobs: num_cpus::get(),
            debug_level: defaults::DEFAULT_B2_DEBUG_LEVEL,
            mpi_bin: None,
        }
    }
}

/// Libraries discovered per library short name after a build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Library short name -> logical library names found in its lib dir
    pub libraries: BTreeMap<String, Vec<String>>,
}

/// Assemble the deterministic build tool argument list for one library
pub fn b2_args(package: &Package, lib_short_name: &str, config: &BuildConfig) -> Vec<String> {
    let mut args = vec![
        format!("-j{}", config.jobs),
        format!("-d+{}", config.debug_level),
        "-a".to_string(),
        "--hash=yes".to_string(),
        "--debug-configuration".to_string(),
        "--layout=system".to_string(),
    ];
    for (key, value) in &package.b2_options {
        args.push(format!("{key}={value}"));
    }
    for dep in &package.source_only_deps {
        args.push(format!("include={dep}/include"));
    }
    for define in &package.b2_defines {
        args.push(format!("define={define}"));
    }
    args.push(format!("{lib_short_name}-build"));
    args
}

/// Scan a lib directory for binary artifacts and return their logical names.
///
/// Recognized extensions are shared objects, static archives, import
/// libraries, and dynamic libraries; the platform's `lib` name prefix is
/// stripped except for import libraries. A missing directory is a logged
/// warning and yields an empty set rather than an error.
pub(crate) fn collect_build_libs(lib_dir: &Path) -> Vec<String> {
    if !lib_dir.exists() {
        tracing::warn!(
            "Lib folder doesn't exist, can't collect libraries: {}",
            lib_dir.display()
        );
        return Vec::new();
    }
    let entries = match std::fs::read_dir(lib_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Can't read lib folder {}: {e}", lib_dir.display());
            return Vec::new();
        }
    };

    let mut result = Vec::new();
    for entry in entries.flatten() {
        let file_name = PathBuf::from(entry.file_name());
        let Some(ext) = file_name.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !defaults::LIBRARY_EXTENSIONS.contains(&ext) {
            continue;
        }
        let Some(stem) = file_name.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let name = if ext != "lib" && stem.starts_with("lib") {
            &stem[3..]
        } else {
            stem
        };
        result.push(name.to_string());
    }
    result.sort();
    result
}

/// Build unit for one package, rooted at the package's working directory
pub struct BuildUnit<'a, H, T> {
    package: &'a Package,
    config: &'a BuildConfig,
    host: &'a H,
    tool: &'a T,
    workdir: PathBuf,
}

impl<'a, H: SourceHost, T: BuildTool> BuildUnit<'a, H, T> {
    /// Create a build unit for one package
    pub fn new(
        package: &'a Package,
        config: &'a BuildConfig,
        host: &'a H,
        tool: &'a T,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            package,
            config,
            host,
            tool,
            workdir: workdir.into(),
        }
    }

    /// The package's working directory
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Fetch source archives for every owned library plus the source-only
    /// dependencies. Members of a cycle group fetch nothing; the group fetched
    /// their sources already.
    pub async fn fetch_source(&self) -> Result<(), FetchError> {
        if matches!(self.package.kind, PackageKind::CycleGroupMember { .. }) {
            tracing::debug!("{}: member of a cycle group, no fetch", self.package.name);
            return Ok(());
        }

        let mut libs_to_get = self.package.lib_short_names.clone();
        libs_to_get.extend(self.package.source_only_deps.iter().cloned());

        for library in libs_to_get {
            if self.workdir.join(&library).is_dir() {
                tracing::debug!("{library}: already materialized, skipping fetch");
                continue;
            }
            self.host.fetch_archive(&library, &self.workdir).await?;
        }
        Ok(())
    }

    /// Build every library of the package.
    ///
    /// Header-only libraries get a generated root descriptor; compiled ones
    /// run the external tool and have their artifacts collected into the
    /// descriptor, with a canonical `boost_<name>` alias synthesized when the
    /// tool did not produce one.
    pub async fn build(&self) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        if matches!(self.package.kind, PackageKind::CycleGroupMember { .. }) {
            tracing::debug!("{}: member of a cycle group, no build", self.package.name);
            return Ok(report);
        }

        for lib_short_name in &self.package.lib_short_names {
            let lib_dir = self.workdir.join(lib_short_name).join("lib");
            if self.package.is_header_only(lib_short_name) {
                self.append_jam(&lib_dir, &jam::header_only_root(lib_short_name))?;
                continue;
            }

            let args = b2_args(self.package, lib_short_name, self.config);
            let env = self.tool_env();
            tracing::info!(
                "{}: {} {}",
                self.workdir.display(),
                defaults::BUILD_TOOL,
                args.join(" ")
            );
            self.tool
                .run(lib_short_name, &args, &self.workdir, &env)
                .await?;

            let libs = collect_build_libs(&lib_dir);
            let mut statements = String::new();
            for lib in &libs {
                statements.push_str(&jam::search_lib(lib));
            }
            if !libs.is_empty() && !libs.contains(&format!("boost_{lib_short_name}")) {
                statements.push_str(&jam::alias(lib_short_name, &libs));
            }
            if !statements.is_empty() {
                self.append_jam(&lib_dir, &statements)?;
            }
            report.libraries.insert(lib_short_name.clone(), libs);
        }
        Ok(report)
    }

    fn tool_env(&self) -> Vec<(String, String)> {
        let mut env = Vec::new();
        if let Some(mpi_bin) = &self.config.mpi_bin {
            let path = std::env::var("PATH").unwrap_or_default();
            env.push((
                "PATH".to_string(),
                format!("{}:{path}", mpi_bin.display()),
            ));
        }
        env
    }

    fn append_jam(&self, lib_dir: &Path, content: &str) -> Result<(), BuildError> {
        let io_err = |path: &Path, e: std::io::Error| BuildError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        };
        std::fs::create_dir_all(lib_dir).map_err(|e| io_err(lib_dir, e))?;
        let jam_file = lib_dir.join("jamroot.jam");
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&jam_file)
            .map_err(|e| io_err(&jam_file, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| io_err(&jam_file, e))
    }
}
