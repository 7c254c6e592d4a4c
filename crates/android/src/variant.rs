//! Build variants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use weightcalc_core::error::Error;

/// A build configuration producing a distinct packaged artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Signed release build
    Release,
    /// Debug build
    Debug,
}

impl Variant {
    /// All variants, in the order their packaging tasks are declared
    pub const ALL: [Variant; 2] = [Variant::Release, Variant::Debug];

    /// Lowercase name used in file names and paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }

    /// Gradle task that packages this variant
    pub fn assemble_task(&self) -> &'static str {
        match self {
            Self::Release => "assembleRelease",
            Self::Debug => "assembleDebug",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "release" => Ok(Self::Release),
            "debug" => Ok(Self::Debug),
            other => Err(Error::validation(format!("Unknown build variant: {}", other))
                .with_suggestion("Use 'release' or 'debug'")),
        }
    }
}
