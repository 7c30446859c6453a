//! Global configuration for amgctl.
//!
//! User-wide settings live in a single TOML file outside any project:
//!
//! - Unix/macOS: `~/.amgctl/config.toml`
//! - Windows: `%LOCALAPPDATA%\amgctl\config.toml`
//!
//! A different file can be selected with `--config <path>`. A missing file is
//! not an error; every setting has a default.
//!
//! ```toml
//! [upgrade]
//! repo_owner = "weka"
//! repo_name = "amg-utils"
//! asset_format = "binary"
//! download_timeout_secs = 600
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::core::AmgctlError;
use crate::upgrade::config::UpgradeConfig;

/// Global configuration structure for amgctl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Self-update settings from the `[upgrade]` table.
    #[serde(default)]
    pub upgrade: UpgradeConfig,
}

impl GlobalConfig {
    /// Load global configuration from the default location.
    ///
    /// Returns the defaults when the file does not exist.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load global configuration from `path`, or the default location when `None`.
    ///
    /// Returns the defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No path was given and the default path cannot be determined
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML or values of the wrong type
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load global configuration from a specific file path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use amgctl_cli::config::GlobalConfig;
    /// use std::path::Path;
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let config = GlobalConfig::load_from(Path::new("/custom/config.toml")).await?;
    /// println!("Updates come from {}", config.upgrade.releases_url());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        let config = toml::from_str(&content).map_err(|e| AmgctlError::ConfigError {
            message: format!("Failed to parse {}: {e}", path.display()),
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save global configuration to a specific file path.
    ///
    /// Creates parent directories as needed and writes pretty-formatted TOML.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize global config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write global config to {}", path.display()))?;

        Ok(())
    }

    /// Get the default file path for global configuration.
    ///
    /// - **Windows**: `%LOCALAPPDATA%\amgctl\config.toml`
    /// - **Unix/macOS**: `~/.amgctl/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("amgctl")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".amgctl")
        };

        Ok(config_dir.join("config.toml"))
    }
}
