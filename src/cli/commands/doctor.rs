//! Doctor command implementation
//!
//! Checks that the external tools the build driver shells out to are
//! reachable on PATH.

use anyhow::Result;

use crate::cli::output::status;
use crate::config::defaults;

/// Execute the doctor command. Returns an error when a required tool is
/// missing so scripted setups fail loudly.
pub fn execute() -> Result<()> {
    let tools = [
        (defaults::BUILD_TOOL, "external build tool"),
        (defaults::REGISTRY_TOOL, "package registry tool"),
        ("tar", "archive unpacking"),
    ];

    let mut missing = Vec::new();
    for (tool, purpose) in tools {
        match which::which(tool) {
            Ok(path) => {
                println!("{} {tool} ({purpose}): {}", status::SUCCESS, path.display());
            }
            Err(_) => {
                println!("{} {tool} ({purpose}): not found on PATH", status::ERROR);
                missing.push(tool);
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("missing required tools: {}", missing.join(", "));
    }
}
