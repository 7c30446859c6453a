//! Platform detection and release asset selection.
//!
//! Release assets follow the naming convention `<binary>-<os>-<arch>`, with
//! `.exe` appended on Windows or `.tar.gz` for archive releases. OS and
//! architecture names use the release convention (`darwin`, `amd64`,
//! `arm64`), not Rust's target names.

use std::fmt;

use tracing::debug;

use crate::constants::ARCHIVE_SUFFIX;
use crate::core::AmgctlError;
use crate::upgrade::config::AssetFormat;
use crate::upgrade::release::{ReleaseAsset, ReleaseDescriptor};

/// Operating system and architecture of a build, in release naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Operating system, e.g. `linux`, `darwin`, `windows`
    pub os: String,
    /// CPU architecture, e.g. `amd64`, `arm64`
    pub arch: String,
}

impl Platform {
    /// Build a platform from Rust-style OS and architecture names.
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: release_os_name(os).to_string(),
            arch: release_arch_name(arch).to_string(),
        }
    }

    /// The platform of the running process.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Whether executables on this platform carry an `.exe` suffix.
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

fn release_os_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn release_arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}

/// The exact asset file name expected for `platform`.
///
/// Pure and deterministic. The same string is the lookup key in the
/// checksum manifest.
///
/// # Examples
///
/// ```rust
/// use amgctl_cli::upgrade::config::AssetFormat;
/// use amgctl_cli::upgrade::platform::{Platform, expected_asset_name};
///
/// let linux = Platform::new("linux", "x86_64");
/// assert_eq!(expected_asset_name("amgctl", &linux, AssetFormat::Binary), "amgctl-linux-amd64");
///
/// let windows = Platform::new("windows", "x86_64");
/// assert_eq!(
///     expected_asset_name("amgctl", &windows, AssetFormat::Binary),
///     "amgctl-windows-amd64.exe"
/// );
/// ```
pub fn expected_asset_name(binary_name: &str, platform: &Platform, format: AssetFormat) -> String {
    let stem = format!("{binary_name}-{}-{}", platform.os, platform.arch);
    match format {
        AssetFormat::TarGz => format!("{stem}{ARCHIVE_SUFFIX}"),
        AssetFormat::Binary if platform.is_windows() => format!("{stem}.exe"),
        AssetFormat::Binary => stem,
    }
}

/// Select the asset named exactly `asset_name` from `release`.
///
/// No fuzzy matching and no fallback to another architecture.
pub fn select_asset<'a>(
    release: &'a ReleaseDescriptor,
    asset_name: &str,
    platform: &Platform,
) -> Result<&'a ReleaseAsset, AmgctlError> {
    match release.find_asset(asset_name) {
        Some(asset) => {
            debug!("Selected asset {} from release {}", asset.name, release.tag_name);
            Ok(asset)
        }
        None => Err(AmgctlError::NoAssetForPlatform {
            asset: asset_name.to_string(),
            platform: platform.to_string(),
        }),
    }
}
