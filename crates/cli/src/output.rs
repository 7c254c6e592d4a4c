//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET: AtomicBool = AtomicBool::new(false);

/// Status message helpers
pub struct Status;

impl Status {
    /// Suppress success, info, and warning output; errors still print
    pub fn set_quiet(quiet: bool) {
        QUIET.store(quiet, Ordering::Relaxed);
    }

    /// Whether non-error output is suppressed
    pub fn is_quiet() -> bool {
        QUIET.load(Ordering::Relaxed)
    }

    /// Print a success message
    pub fn success(message: &str) {
        if !Self::is_quiet() {
            println!("{} {}", "✓".green(), message);
        }
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        if !Self::is_quiet() {
            eprintln!("{} {}", "⚠".yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(message: &str) {
        if !Self::is_quiet() {
            println!("{} {}", "ℹ".blue(), message);
        }
    }

    /// Print a header
    pub fn header(message: &str) {
        if !Self::is_quiet() {
            println!();
            println!("{}", message.bold());
            println!("{}", "─".repeat(message.chars().count()));
        }
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{}m {:.0}s", mins, remaining_secs)
    }
}

/// Format a file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        let d = Duration::from_millis(500);
        assert_eq!(format_duration(d), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        let d = Duration::from_secs_f32(5.5);
        assert_eq!(format_duration(d), "5.5s");
    }

    #[test]
    fn test_format_duration_mins() {
        let d = Duration::from_secs(125);
        assert_eq!(format_duration(d), "2m 5s");
    }

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(500), "500 B");
    }

    #[test]
    fn test_format_size_mb() {
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "variant", "variants"), "1 variant");
        assert_eq!(format_count(2, "variant", "variants"), "2 variants");
    }

    #[test]
    fn test_quiet_toggle() {
        Status::set_quiet(true);
        assert!(Status::is_quiet());
        Status::set_quiet(false);
        assert!(!Status::is_quiet());
    }
}
