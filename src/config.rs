use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::status::StatusThresholds;

pub const CONFIG_FILE: &str = "config.yaml";

/// Environment variable overriding the configured passcode.
pub const PASSCODE_ENV: &str = "CODECART_PASSCODE";

/// Tracker settings, read from `.codecart/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Passcode accepted by `codecart unlock`. Empty disables unlocking.
    pub passcode: String,
    pub thresholds: StatusThresholds,
}

impl Config {
    /// Read the config in `dir`, falling back to defaults when the file is
    /// missing or invalid, then apply environment overrides.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        let mut config = match fs::read_to_string(&path) {
            Ok(raw) => serde_yaml::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Config::default()
            }),
            Err(_) => Config::default(),
        };

        if let Ok(passcode) = std::env::var(PASSCODE_ENV) {
            config.passcode = passcode;
        }

        config
    }

    /// Write this config to `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(dir.join(CONFIG_FILE), yaml)?;
        Ok(())
    }
}
