//! Artifact layout
//!
//! Turns the `[publish]` configuration into concrete paths for a variant.
//! Candidate locations are data: reordering or adding output directories is
//! a configuration change, not a code change.

use crate::variant::Variant;
use std::path::{Path, PathBuf};
use weightcalc_core::config::{ConfigSchema, OverwritePolicy};
use weightcalc_core::error::{Error, Result};

/// Reference to one variant's packaged artifact and where it is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    /// Build variant
    pub variant: Variant,
    /// Ordered candidate locations; the first existing one wins
    pub candidates: Vec<PathBuf>,
    /// Directory the canonical copy is written to
    pub dest_dir: PathBuf,
    /// Canonical file name, e.g. `WeightCalculator-release.apk`
    pub dest_name: String,
}

impl ArtifactRef {
    /// Create a reference; at least one candidate is required
    pub fn new(
        variant: Variant,
        candidates: Vec<PathBuf>,
        dest_dir: impl Into<PathBuf>,
        dest_name: impl Into<String>,
    ) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::validation(format!(
                "No candidate paths given for the {} artifact",
                variant
            )));
        }

        Ok(Self {
            variant,
            candidates,
            dest_dir: dest_dir.into(),
            dest_name: dest_name.into(),
        })
    }

    /// Full destination path
    pub fn dest_path(&self) -> PathBuf {
        self.dest_dir.join(&self.dest_name)
    }
}

/// Configuration-driven layout of build outputs
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    /// Product name substituted for `{product}`
    pub product_name: String,
    /// Build output root all templates are relative to
    pub build_dir: PathBuf,
    /// Ordered candidate templates
    pub candidates: Vec<String>,
    /// Destination directory template
    pub dest_dir: String,
    /// Canonical file name template
    pub file_name: String,
    /// Destination overwrite behavior
    pub overwrite: OverwritePolicy,
}

impl ArtifactLayout {
    /// Build from configuration, optionally overriding the build output root
    pub fn from_config(schema: &ConfigSchema, build_dir: Option<&Path>) -> Self {
        Self {
            product_name: schema.general.product_name.clone(),
            build_dir: build_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(&schema.general.build_dir)),
            candidates: schema.publish.candidates.clone(),
            dest_dir: schema.publish.dest_dir.clone(),
            file_name: schema.publish.file_name.clone(),
            overwrite: schema.publish.overwrite,
        }
    }

    /// Resolve the artifact reference for a variant
    pub fn artifact(&self, variant: Variant) -> Result<ArtifactRef> {
        let candidates = self
            .candidates
            .iter()
            .map(|t| self.build_dir.join(self.render(t, variant)))
            .collect();

        ArtifactRef::new(
            variant,
            candidates,
            self.build_dir.join(self.render(&self.dest_dir, variant)),
            self.render(&self.file_name, variant),
        )
    }

    fn render(&self, template: &str, variant: Variant) -> String {
        render_template(template, variant, &self.product_name)
    }
}

/// Substitute `{variant}` and `{product}` in a template
pub fn render_template(template: &str, variant: Variant, product: &str) -> String {
    template
        .replace("{variant}", variant.as_str())
        .replace("{product}", product)
}
