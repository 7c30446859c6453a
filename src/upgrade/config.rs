use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_BINARY_NAME, DEFAULT_DOWNLOAD_TIMEOUT_SECS,
    DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_REPO_NAME, DEFAULT_REPO_OWNER,
};

/// How release artifacts are packaged.
///
/// Determines the asset name the selector looks for and whether the archive
/// extractor has work to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetFormat {
    /// A bare executable named `<binary>-<os>-<arch>[.exe]`.
    #[default]
    Binary,
    /// A gzip'd tarball named `<binary>-<os>-<arch>.tar.gz` containing the executable.
    TarGz,
}

/// Configuration settings for amgctl self-update behavior.
///
/// `UpgradeConfig` says where releases are published and how long each
/// network stage may take. It lives in the `[upgrade]` table of the global
/// config file; every field has a default so the table may be omitted.
///
/// # Examples
///
/// ```rust,no_run
/// use amgctl_cli::upgrade::config::UpgradeConfig;
///
/// let config = UpgradeConfig::default();
/// assert_eq!(config.repo_owner, "weka");
/// assert_eq!(
///     config.releases_url(),
///     "https://api.github.com/repos/weka/amg-utils/releases"
/// );
/// ```
///
/// ## TOML Example
/// ```toml
/// [upgrade]
/// api_url = "https://api.github.com"
/// repo_owner = "weka"
/// repo_name = "amg-utils"
/// binary_name = "amgctl"
/// asset_format = "binary"
/// feed_timeout_secs = 30
/// download_timeout_secs = 300
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Base URL of the release API. Overridden in tests to point at a mock server.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Repository owner on the release host.
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name on the release host.
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Executable base name used in asset names and archive lookups.
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Packaging of the release artifacts.
    #[serde(default)]
    pub asset_format: AssetFormat,

    /// Timeout in seconds for the release listing and checksum manifest.
    #[serde(default = "default_feed_timeout_secs")]
    pub feed_timeout_secs: u64,

    /// Timeout in seconds for the artifact download.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            binary_name: default_binary_name(),
            asset_format: AssetFormat::default(),
            feed_timeout_secs: default_feed_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_repo_owner() -> String {
    DEFAULT_REPO_OWNER.to_string()
}

fn default_repo_name() -> String {
    DEFAULT_REPO_NAME.to_string()
}

fn default_binary_name() -> String {
    DEFAULT_BINARY_NAME.to_string()
}

const fn default_feed_timeout_secs() -> u64 {
    DEFAULT_FEED_TIMEOUT_SECS
}

const fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

impl UpgradeConfig {
    /// URL of the release listing endpoint.
    ///
    /// A trailing slash on `api_url` is tolerated.
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url.trim_end_matches('/'),
            self.repo_owner,
            self.repo_name
        )
    }

    /// Timeout applied to the listing and manifest requests.
    pub const fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    /// Timeout applied to the artifact download.
    pub const fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
