//! Engine locations and lock timeout, loaded from an optional JSON file

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_VERAPDF: &str = "verapdf";
pub const DEFAULT_POLICY_CHECKER: &str = "xsltproc";

/// Settings file contents; every field is optional
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// veraPDF executable
    pub verapdf: PathBuf,
    /// Policy checker executable, invoked as `<checker> <policy> <report>`
    pub policy_checker: PathBuf,
    /// Seconds to wait for the validation engine; absent means wait forever
    pub lock_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verapdf: PathBuf::from(DEFAULT_VERAPDF),
            policy_checker: PathBuf::from(DEFAULT_POLICY_CHECKER),
            lock_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Settings from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_secs.map(Duration::from_secs)
    }
}
