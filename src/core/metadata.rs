//! Package metadata loading and validation
//!
//! Parses the `package-data-<label>.json` file describing every package of
//! one Boost release: its libraries, dependencies, header-only status, and
//! cycle-group membership.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// Raw JSON shape of one package entry. Every field is defaulted so sparse
/// entries stay valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageEntry {
    /// Library short names contained in this package (defaults to the
    /// package name itself)
    #[serde(default)]
    pub lib_short_names: Vec<String>,

    /// Regular dependencies, by package name
    #[serde(default)]
    pub b2_requires: Vec<String>,

    /// Build-time dependencies, by package name
    #[serde(default)]
    pub b2_build_requires: Vec<String>,

    /// Libraries whose sources are needed at build time but never linked
    #[serde(default)]
    pub source_only_deps: Vec<String>,

    /// Libraries of this package that publish headers only
    #[serde(default)]
    pub header_only_libs: Vec<String>,

    /// Extra `key=value` options passed to the build tool
    #[serde(default)]
    pub b2_options: BTreeMap<String, String>,

    /// Extra preprocessor defines passed to the build tool
    #[serde(default)]
    pub b2_defines: Vec<String>,

    /// Name of the cycle group this package belongs to, if any
    #[serde(default)]
    pub cycle_group: Option<String>,

    /// Whether this package is itself a cycle group
    #[serde(default)]
    pub is_cycle_group: bool,
}

/// Discriminates how a package participates in the build, decided once at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageKind {
    /// Ordinary package owning its own fetch and build
    Standalone,
    /// Bundle of mutually dependent libraries built as one unit
    CycleGroup,
    /// Aliasing shim over an already-built cycle group
    CycleGroupMember {
        /// Name of the owning cycle group package
        group: String,
    },
}

/// A validated package with defaults resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    /// Unique package name
    pub name: String,
    /// How this package participates in the build
    pub kind: PackageKind,
    /// Library short names (cycle groups list every member library)
    pub lib_short_names: Vec<String>,
    /// Regular dependencies
    pub b2_requires: Vec<String>,
    /// Build-time dependencies
    pub b2_build_requires: Vec<String>,
    /// Source-only dependencies
    pub source_only_deps: Vec<String>,
    /// Header-only libraries of this package
    pub header_only_libs: BTreeSet<String>,
    /// Build tool options
    pub b2_options: BTreeMap<String, String>,
    /// Build tool defines
    pub b2_defines: Vec<String>,
}

fn short_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid short name pattern"))
}

impl Package {
    /// Build a validated package from its raw metadata entry
    pub fn from_entry(name: &str, entry: PackageEntry) -> Result<Self, MetadataError> {
        if !short_name_pattern().is_match(name) {
            return Err(MetadataError::InvalidName {
                package: name.to_string(),
                name: name.to_string(),
            });
        }
        for lib in &entry.lib_short_names {
            if !short_name_pattern().is_match(lib) {
                return Err(MetadataError::InvalidName {
                    package: name.to_string(),
                    name: lib.clone(),
                });
            }
        }

        let kind = match (entry.is_cycle_group, entry.cycle_group) {
            (true, Some(group)) => {
                return Err(MetadataError::ConflictingKind {
                    package: name.to_string(),
                    group,
                });
            }
            (true, None) => PackageKind::CycleGroup,
            (false, Some(group)) if !group.is_empty() => PackageKind::CycleGroupMember { group },
            _ => PackageKind::Standalone,
        };

        let lib_short_names = if entry.lib_short_names.is_empty() {
            vec![name.to_string()]
        } else {
            entry.lib_short_names
        };

        Ok(Self {
            name: name.to_string(),
            kind,
            lib_short_names,
            b2_requires: entry.b2_requires,
            b2_build_requires: entry.b2_build_requires,
            source_only_deps: entry.source_only_deps,
            header_only_libs: entry.header_only_libs.into_iter().collect(),
            b2_options: entry.b2_options,
            b2_defines: entry.b2_defines,
        })
    }

    /// Whether one library of this package is header-only
    pub fn is_header_only(&self, lib_short_name: &str) -> bool {
        self.header_only_libs.contains(lib_short_name)
    }

    /// Whether every library of this package is header-only
    pub fn is_entirely_header_only(&self) -> bool {
        self.lib_short_names
            .iter()
            .all(|lib| self.is_header_only(lib))
    }

    /// The library short name member packages resolve through the group with
    pub fn lib_name(&self) -> &str {
        self.lib_short_names
            .first()
            .map_or(self.name.as_str(), String::as_str)
    }
}

/// The full set of packages for one release
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageSet {
    packages: BTreeMap<String, Package>,
}

impl PackageSet {
    /// Parse a package set from the JSON package data format
    pub fn from_json(content: &str) -> Result<Self, MetadataError> {
        let entries: BTreeMap<String, PackageEntry> = serde_json::from_str(content)?;
        let mut packages = BTreeMap::new();
        for (name, entry) in entries {
            let package = Package::from_entry(&name, entry)?;
            packages.insert(name, package);
        }
        Ok(Self { packages })
    }

    /// Load a package set from a file on disk
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let content = std::fs::read_to_string(path).map_err(|e| MetadataError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Look up one package by name
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Whether a package with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Iterate packages in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Package)> {
        self.packages.iter()
    }

    /// Number of packages in the set
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
