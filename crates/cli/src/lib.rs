//! CLI utilities for Weight Calculator build tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Progress indicators
//! - Status messages

#![warn(missing_docs)]

pub mod output;
pub mod progress;
