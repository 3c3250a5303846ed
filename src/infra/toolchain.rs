//! External build tool invocation
//!
//! Runs `b2` as a child process with a caller-supplied working directory,
//! environment overrides, and an optional timeout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::defaults;
use crate::core::build::BuildTool;
use crate::error::BuildError;

/// Runs the external build tool as a child process
#[derive(Debug, Clone)]
pub struct ProcessBuildTool {
    program: String,
    timeout: Option<Duration>,
}

impl Default for ProcessBuildTool {
    fn default() -> Self {
        Self::new(defaults::BUILD_TOOL)
    }
}

impl ProcessBuildTool {
    /// Create a runner for the given program
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Abort invocations that run longer than `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Locate the build tool on PATH
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }

    fn command_line(&self, args: &[String]) -> String {
        format!("{} {}", self.program, args.join(" "))
    }
}

impl BuildTool for ProcessBuildTool {
    async fn run(
        &self,
        library: &str,
        args: &[String],
        cwd: &Path,
        env: &[(String, String)],
    ) -> Result<(), BuildError> {
        let command_line = self.command_line(args);
        let mut command = tokio::process::Command::new(&self.program);
        command.args(args).current_dir(cwd);
        for (key, value) in env {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|e| BuildError::ToolSpawn {
            command: command_line.clone(),
            error: e.to_string(),
        })?;

        let status = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(BuildError::ToolTimeout {
                        library: library.to_string(),
                        command: command_line,
                        seconds: timeout.as_secs(),
                    });
                }
            },
            None => child.wait().await,
        }
        .map_err(|e| BuildError::ToolSpawn {
            command: command_line.clone(),
            error: e.to_string(),
        })?;

        if !status.success() {
            return Err(BuildError::ToolFailed {
                library: library.to_string(),
                command: command_line,
                status: status.code().unwrap_or(-1),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_invocation() {
        let tool = ProcessBuildTool::new("true");
        tool.run("lib", &[], Path::new("."), &[])
            .await
            .expect("true exits zero");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failure() {
        let tool = ProcessBuildTool::new("false");
        let err = tool
            .run("lib", &[], Path::new("."), &[])
            .await
            .expect_err("false exits non-zero");
        assert!(matches!(err, BuildError::ToolFailed { status: 1, .. }));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let tool = ProcessBuildTool::new("definitely-not-a-real-binary");
        let err = tool
            .run("lib", &[], Path::new("."), &[])
            .await
            .expect_err("must fail");
        assert!(matches!(err, BuildError::ToolSpawn { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_the_tool() {
        let tool = ProcessBuildTool::new("sleep").with_timeout(Duration::from_millis(50));
        let err = tool
            .run("lib", &["5".to_string()], Path::new("."), &[])
            .await
            .expect_err("must time out");
        assert!(matches!(err, BuildError::ToolTimeout { .. }));
    }
}
