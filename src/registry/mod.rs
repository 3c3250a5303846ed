//! Package registry client
//!
//! Wraps the external registry tool for the two operations the build driver
//! needs: clearing the family's packages before a full rebuild and creating
//! a package from its working directory.

use std::path::Path;

use crate::config::defaults;
use crate::error::RegistryError;

/// Client for the external package registry tool
#[derive(Debug, Clone)]
pub struct RegistryClient {
    program: String,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new(defaults::REGISTRY_TOOL)
    }
}

impl RegistryClient {
    /// Create a client wrapping the given registry binary
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Remove every registry package matching `pattern`
    pub async fn remove(&self, pattern: &str) -> Result<(), RegistryError> {
        self.invoke(&["remove".to_string(), "-f".to_string(), pattern.to_string()])
            .await
    }

    /// Create a registry package from `package_dir` under `channel`
    pub async fn create(
        &self,
        package_dir: &Path,
        channel: &str,
        extra_args: &[String],
    ) -> Result<(), RegistryError> {
        let mut args = vec![
            "create".to_string(),
            package_dir.display().to_string(),
            channel.to_string(),
        ];
        args.extend(extra_args.iter().cloned());
        self.invoke(&args).await
    }

    async fn invoke(&self, args: &[String]) -> Result<(), RegistryError> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        tracing::info!("registry: {command_line}");

        let status = tokio::process::Command::new(&self.program)
            .args(args)
            .status()
            .await
            .map_err(|e| RegistryError::Spawn {
                command: command_line.clone(),
                error: e.to_string(),
            })?;
        if !status.success() {
            return Err(RegistryError::CommandFailed {
                command: command_line,
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}
