//! Configuration schema definitions

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholders accepted in path and file name templates
pub const TEMPLATE_PLACEHOLDERS: &[&str] = &["variant", "product"];

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid placeholder regex"));

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub publish: PublishConfig,
}

impl ConfigSchema {
    /// Check semantic constraints that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        if self.general.product_name.trim().is_empty() {
            return Err(Error::config_invalid("general.product_name must not be empty"));
        }

        if self.publish.candidates.is_empty() {
            return Err(Error::config_invalid(
                "publish.candidates must list at least one path",
            )
            .with_suggestion("Remove the key to use the default Flutter and Gradle output paths"));
        }

        for candidate in &self.publish.candidates {
            check_template("publish.candidates", candidate)?;
        }
        check_template("publish.dest_dir", &self.publish.dest_dir)?;
        check_template("publish.file_name", &self.publish.file_name)?;

        if self.publish.file_name.contains(['/', '\\']) {
            return Err(Error::config_invalid(format!(
                "publish.file_name must be a bare file name, got '{}'",
                self.publish.file_name
            )));
        }

        Ok(())
    }
}

fn check_template(key: &str, template: &str) -> Result<()> {
    if template.trim().is_empty() {
        return Err(Error::config_invalid(format!("{} must not be empty", key)));
    }

    for cap in PLACEHOLDER_RE.captures_iter(template) {
        let name = &cap[1];
        if !TEMPLATE_PLACEHOLDERS.contains(&name) {
            return Err(Error::config_invalid(format!(
                "Unknown placeholder '{{{}}}' in {}: '{}'",
                name, key, template
            ))
            .with_suggestion("Supported placeholders are {variant} and {product}"));
        }
    }

    Ok(())
}

/// General project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Product name used in canonical artifact names
    #[serde(default = "default_product_name")]
    pub product_name: String,

    /// Build output root of the app module
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Android project directory holding the Gradle wrapper
    #[serde(default = "default_project_dir")]
    pub project_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            product_name: default_product_name(),
            build_dir: default_build_dir(),
            project_dir: default_project_dir(),
        }
    }
}

fn default_product_name() -> String {
    "WeightCalculator".to_string()
}

fn default_build_dir() -> String {
    "build/app".to_string()
}

fn default_project_dir() -> String {
    "android".to_string()
}

/// Artifact publishing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Ordered candidate templates, relative to the build dir; first existing wins
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,

    /// Destination directory template, relative to the build dir
    #[serde(default = "default_dest_dir")]
    pub dest_dir: String,

    /// Canonical file name template
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// What to do when the destination already exists
    #[serde(default)]
    pub overwrite: OverwritePolicy,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            dest_dir: default_dest_dir(),
            file_name: default_file_name(),
            overwrite: OverwritePolicy::default(),
        }
    }
}

fn default_candidates() -> Vec<String> {
    vec![
        "outputs/flutter-apk/app-{variant}.apk",
        "outputs/apk/{variant}/app-{variant}.apk",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_dest_dir() -> String {
    "outputs/flutter-apk".to_string()
}

fn default_file_name() -> String {
    "{product}-{variant}.apk".to_string()
}

/// Destination overwrite behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// Always copy, replacing any existing destination
    #[default]
    Always,
    /// Skip the copy when the destination already has identical contents
    IfChanged,
}
