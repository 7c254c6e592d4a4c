//! Core utilities for Weight Calculator build tools
//!
//! This crate provides shared functionality used by the Android tooling:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Process execution**: Command execution with captured output
//!
//! # Example
//!
//! ```rust,no_run
//! use weightcalc_core::config::Config;
//!
//! let config = Config::load(None).expect("invalid configuration");
//! println!("Publishing {} artifacts", config.schema.general.product_name);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;

pub use error::{Error, ErrorCode, Result, ResultExt};

