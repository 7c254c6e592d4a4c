//! Android tooling for Weight Calculator
//!
//! This crate provides the post-build steps of the Android embedding:
//! - Build variants and their Gradle packaging tasks
//! - Configuration-driven artifact layout (candidate outputs, canonical names)
//! - Locating a packaged APK and publishing it under its canonical name
//! - Gradle wrapper integration (assemble, then publish)

#![warn(missing_docs)]

pub mod gradle;
pub mod layout;
pub mod publish;
pub mod variant;

pub use layout::{ArtifactLayout, ArtifactRef};
pub use publish::{locate, publish, CandidateStatus, PublishResult};
pub use variant::Variant;
