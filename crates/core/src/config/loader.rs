//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(Path::new(".")),
        };

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn default() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.schema)?)
    }

    /// Render the effective configuration as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.schema)?)
    }
}

/// Find configuration file in standard locations under `root`
fn find_config_file(root: &Path) -> Option<PathBuf> {
    let candidates = [
        ".weightcalc.toml",
        "weightcalc.toml",
        ".config/weightcalc.toml",
    ];

    candidates
        .iter()
        .map(|c| root.join(c))
        .find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read config file {}", path.display()))?;

    toml::from_str(&content).context(format!("Failed to parse config file {}", path.display()))
}
