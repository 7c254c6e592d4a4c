//! Process execution utilities
//!
//! Runs external commands (the Gradle wrapper in practice) with captured output.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from std::process::Output
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

/// Run a command in a specific directory and capture output
pub fn run_command_in_dir(program: &str, args: &[&str], dir: &Path) -> Result<CommandResult> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            Error::process(format!("Failed to execute {}: {}", program, e))
                .with_context(format!("Working directory: {}", dir.display()))
                .with_source(e)
        })?;

    Ok(CommandResult::from_output(output))
}
