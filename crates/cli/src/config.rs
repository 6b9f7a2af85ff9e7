//! On-disk CLI configuration (`config.json` in the data directory).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_ledger::LedgerConfig;

const CONFIG_FILE: &str = "config.json";

/// Settings written by `tally init` and read by every other command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// When the ledger was bootstrapped.
    pub initialized_at: DateTime<Utc>,
    /// Ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl CliConfig {
    pub fn new(ledger: LedgerConfig) -> Self {
        Self {
            initialized_at: Utc::now(),
            ledger,
        }
    }

    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load the config from a data directory.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let contents = fs::read_to_string(Self::path(data_dir))
            .context("Failed to read config.json. Did you run 'tally init'?")?;
        serde_json::from_str(&contents).context("Invalid config.json")
    }

    /// Write the config into a data directory.
    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        let path = Self::path(data_dir);
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
