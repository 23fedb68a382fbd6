//! datebook configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::date::YearMonth;
use crate::error::{DatebookError, DatebookResult};
use crate::store::remote::DEFAULT_TIMEOUT;
use crate::store::{LocalStore, RemoteStore, StoreBackend};

const DEFAULT_BOOTSTRAP_MONTH: YearMonth = match YearMonth::new(2025, 3) {
    Some(month) => month,
    None => panic!("invalid default bootstrap month"),
};
const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT.as_secs();

fn default_bootstrap_month() -> YearMonth {
    DEFAULT_BOOTSTRAP_MONTH
}

fn is_default_bootstrap_month(month: &YearMonth) -> bool {
    *month == default_bootstrap_month()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn is_default_timeout_secs(secs: &u64) -> bool {
    *secs == DEFAULT_TIMEOUT_SECS
}

/// Configuration at ~/.config/datebook/config.toml, overridable with
/// `DATEBOOK_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatebookConfig {
    /// Base URL of a datebook-server. Without one, appointments live in
    /// memory for the lifetime of the process.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Month shown before any navigation.
    #[serde(
        default = "default_bootstrap_month",
        skip_serializing_if = "is_default_bootstrap_month"
    )]
    pub bootstrap_month: YearMonth,

    #[serde(
        default = "default_timeout_secs",
        skip_serializing_if = "is_default_timeout_secs"
    )]
    pub request_timeout_secs: u64,
}

impl Default for DatebookConfig {
    fn default() -> Self {
        DatebookConfig {
            server_url: None,
            bootstrap_month: default_bootstrap_month(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DatebookConfig {
    pub fn config_path() -> DatebookResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DatebookError::Config("Could not determine config directory".into()))?
            .join("datebook");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented template there
    /// on first use.
    pub fn load() -> DatebookResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Layer `path` (optional) under `DATEBOOK_*` environment variables.
    pub fn load_from(path: &Path) -> DatebookResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("DATEBOOK"))
            .build()
            .map_err(|e| DatebookError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DatebookError::Config(e.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The store this configuration points at.
    pub fn store(&self) -> DatebookResult<StoreBackend> {
        match &self.server_url {
            Some(url) => Ok(StoreBackend::Remote(RemoteStore::new(
                url,
                self.request_timeout(),
            )?)),
            None => Ok(StoreBackend::Local(LocalStore::new())),
        }
    }

    /// Save to ~/.config/datebook/config.toml
    pub fn save(&self) -> DatebookResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> DatebookResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| DatebookError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| DatebookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DatebookResult<()> {
        let contents = format!(
            "\
# datebook configuration

# Appointment server; leave unset to keep appointments in memory:
# server_url = \"http://127.0.0.1:3000\"

# Month shown on start-up (YYYY-MM):
# bootstrap_month = \"{}\"

# Seconds before a server request is given up:
# request_timeout_secs = {}
",
            DEFAULT_BOOTSTRAP_MONTH.to_key(),
            DEFAULT_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatebookError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DatebookError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
