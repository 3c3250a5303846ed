//! Plan command implementation
//!
//! Computes and prints the leveled build plan without building anything.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::commands::resolve_label;
use crate::config::urls;
use crate::core::graph::build_graph;
use crate::core::metadata::PackageSet;
use crate::core::schedule::schedule;

/// Plan options
pub struct PlanOptions {
    /// Boost version (`develop`, `master`, or a release version)
    pub version: String,
    /// Directory holding the package data files
    pub data_dir: PathBuf,
    /// Emit the plan as JSON
    pub json: bool,
}

/// Execute the plan command
pub fn execute(options: &PlanOptions) -> Result<()> {
    let label = resolve_label(&options.version)?;
    let data_file = options.data_dir.join(urls::package_data_file(&label));
    let packages = PackageSet::load(&data_file)
        .with_context(|| format!("Failed to load package data from {}", data_file.display()))?;

    let graph = build_graph(&packages)?;
    let groups = schedule(graph)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        println!(
            "{} packages in {} groups for {label}",
            packages.len(),
            groups.len()
        );
        for (index, group) in groups.iter().enumerate() {
            let members: Vec<&str> = group.iter().map(String::as_str).collect();
            println!("group {index}: {}", members.join(" "));
        }
    }
    Ok(())
}
