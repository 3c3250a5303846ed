//! Usage metadata assembly and package identity
//!
//! After a package is built, its dependents need to know where its headers
//! and libraries live and which logical names to link. How that metadata is
//! assembled depends on whether the package is standalone, a cycle group, or
//! a member shim indirecting through its group's install root.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::build::collect_build_libs;
use crate::core::metadata::{Package, PackageKind};
use crate::error::InfoError;

/// Linkage/usage metadata one package exposes to its dependents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageInfo {
    /// Header search directories
    pub include_dirs: Vec<PathBuf>,
    /// Library search directories
    pub lib_dirs: Vec<PathBuf>,
    /// Binary directories (mirrors the library directories)
    pub bin_dirs: Vec<PathBuf>,
    /// De-duplicated logical library names to link
    pub libs: BTreeSet<String>,
    /// Preprocessor defines consumers must set
    pub defines: Vec<String>,
}

/// Resolved install roots of already-built cycle groups, by group name
pub type GroupRoots = BTreeMap<String, PathBuf>;

/// Assemble the usage metadata for one package.
///
/// `workdir` is the package's own working directory; member packages ignore
/// it and resolve through their group's root in `group_roots` instead.
pub fn collect_package_info(
    package: &Package,
    workdir: &Path,
    group_roots: &GroupRoots,
) -> Result<PackageInfo, InfoError> {
    let mut info = PackageInfo::default();

    match &package.kind {
        PackageKind::Standalone => {
            for lib in &package.lib_short_names {
                let lib_dir = workdir.join(lib).join("lib");
                info.include_dirs.push(workdir.join(lib).join("include"));
                info.lib_dirs.push(lib_dir.clone());
                if !package.is_header_only(lib) {
                    info.libs.extend(collect_build_libs(&lib_dir));
                }
            }
        }
        // The group only routes directories; its members expose the libs.
        PackageKind::CycleGroup => {
            for lib in &package.lib_short_names {
                info.include_dirs.push(workdir.join(lib).join("include"));
                info.lib_dirs.push(workdir.join(lib).join("lib"));
            }
        }
        PackageKind::CycleGroupMember { group } => {
            let root = group_roots
                .get(group)
                .ok_or_else(|| InfoError::UnresolvedGroup {
                    package: package.name.clone(),
                    group: group.clone(),
                })?;
            let lib = package.lib_name();
            info.include_dirs.push(root.join(lib).join("include"));
            // Header-only members expose headers only; no lib dir, no libs.
            if !package.is_header_only(lib) {
                let lib_dir = root.join(lib).join("lib");
                info.lib_dirs.push(lib_dir.clone());
                info.libs.extend(collect_build_libs(&lib_dir));
            }
        }
    }

    info.bin_dirs = info.lib_dirs.clone();
    info.defines.push(defaults::NO_AUTOLINK_DEFINE.to_string());
    Ok(info)
}

/// How a dependency edge participates in package identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionMode {
    /// Interchangeable only for the exact same dependency version
    FullVersion,
    /// Default registry compatibility rules apply
    Default,
}

/// Identity of one build of a package, deciding when two builds are
/// interchangeable for consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageId {
    /// Header-only: identical regardless of compiler or settings
    HeaderOnly,
    /// Compiled: identity includes dependency version pinning
    Compiled {
        /// Dependency name -> how strictly its version is compared
        requires: BTreeMap<String, VersionMode>,
    },
}

/// Compute the identity of one package build.
///
/// Header-only packages collapse to a settings-independent identity;
/// compiled ones pin family dependencies to strict full-version equality.
pub fn package_id(package: &Package) -> PackageId {
    if package.is_entirely_header_only() {
        return PackageId::HeaderOnly;
    }
    let requires = package
        .b2_requires
        .iter()
        .map(|dep| {
            let mode = if dep.starts_with(defaults::FAMILY_PREFIX) {
                VersionMode::FullVersion
            } else {
                VersionMode::Default
            };
            (dep.clone(), mode)
        })
        .collect();
    PackageId::Compiled { requires }
}
