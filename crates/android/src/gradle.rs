//! Gradle build system integration
//!
//! Runs packaging tasks through the project's Gradle wrapper and publishes
//! the result once the task succeeds.

use crate::layout::ArtifactLayout;
use crate::publish::{publish, PublishResult};
use crate::variant::Variant;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use weightcalc_core::error::{Error, Result, ResultExt};
use weightcalc_core::process::{run_command_in_dir, CommandResult};

/// Lines of Gradle stderr kept in a failure message
const STDERR_TAIL_LINES: usize = 20;

/// Path of the Gradle wrapper inside a project directory
pub fn wrapper_path(project_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        project_dir.join("gradlew.bat")
    } else {
        project_dir.join("gradlew")
    }
}

/// Run a Gradle task
pub fn run_task(project_dir: &Path, task: &str) -> Result<CommandResult> {
    let wrapper = wrapper_path(project_dir);
    if !wrapper.is_file() {
        return Err(Error::file_not_found(&wrapper)
            .with_context(format!("Gradle wrapper missing in {}", project_dir.display()))
            .with_suggestion("Run from the Flutter project root or pass --project-dir"));
    }

    // The child starts in project_dir, so a relative wrapper path would be
    // resolved against it a second time.
    let wrapper = wrapper
        .canonicalize()
        .context(format!("Failed to resolve {}", wrapper.display()))?;

    debug!(task, wrapper = %wrapper.display(), "Running Gradle task");
    let program = wrapper.to_string_lossy();
    run_command_in_dir(&program, &[task], project_dir)
}

/// Build the APK for a variant
pub fn assemble(project_dir: &Path, variant: Variant) -> Result<CommandResult> {
    run_task(project_dir, variant.assemble_task())
}

/// Build the APK for a variant, failing when Gradle exits non-zero
///
/// The error carries the tail of Gradle's stderr as its suggestion.
pub fn assemble_checked(project_dir: &Path, variant: Variant) -> Result<CommandResult> {
    let task = variant.assemble_task();
    let result = assemble(project_dir, variant)?;

    if !result.success {
        return Err(Error::gradle(
            task,
            format!("Gradle exited with code {}", result.exit_code),
        )
        .with_suggestion(stderr_tail(&result.stderr)));
    }

    info!(task, "Gradle task succeeded");
    Ok(result)
}

/// Assemble a variant, then publish its APK
///
/// Publishing runs only after the packaging task succeeded.
pub fn assemble_and_publish(
    project_dir: &Path,
    layout: &ArtifactLayout,
    variant: Variant,
) -> Result<PublishResult> {
    assemble_checked(project_dir, variant)?;
    publish(&layout.artifact(variant)?, layout.overwrite)
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
