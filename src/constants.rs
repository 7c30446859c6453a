//! Global constants used throughout the amgctl codebase.
//!
//! Timeouts, file names, and release-feed defaults shared by the upgrade
//! pipeline, the configuration layer, and the CLI.

/// File name of the checksum manifest published alongside release assets.
pub const CHECKSUMS_ASSET_NAME: &str = "checksums.txt";

/// Suffix identifying a gzip-compressed tar artifact.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Suffix of the sibling file written by the atomic-rename installer.
pub const STAGED_SUFFIX: &str = ".new";

/// Suffix of the backup file written by the backup-swap installer.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Timeout for the release listing and checksum manifest requests (30 seconds).
pub const DEFAULT_FEED_TIMEOUT_SECS: u64 = 30;

/// Timeout for artifact downloads (5 minutes).
///
/// Covers the whole transfer, not just connection establishment.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Base URL of the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Owner of the repository publishing amgctl releases.
pub const DEFAULT_REPO_OWNER: &str = "weka";

/// Repository publishing amgctl releases.
pub const DEFAULT_REPO_NAME: &str = "amg-utils";

/// Executable base name used to build asset names.
pub const DEFAULT_BINARY_NAME: &str = "amgctl";

/// Media type requested from the GitHub API.
pub const GITHUB_ACCEPT_HEADER: &str = "application/vnd.github+json";

/// Environment variable that disables progress bars when set.
pub const NO_PROGRESS_ENV: &str = "AMGCTL_NO_PROGRESS";

/// User-Agent sent with every request; the GitHub API rejects requests without one.
pub fn user_agent() -> String {
    format!("amgctl/{}", env!("CARGO_PKG_VERSION"))
}
