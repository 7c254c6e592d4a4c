//! Progress indicators
//!
//! Spinners for long-running operations such as Gradle builds.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
///
/// The spinner is hidden when stderr is not a terminal or output is quiet.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = if crate::output::Status::is_quiet() {
        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
    } else {
        ProgressBar::new_spinner()
    };
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a spinner with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}
