use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::constants::user_agent;
use crate::core::AmgctlError;

/// Parsed `checksums.txt` manifest: asset file name to hex SHA-256 digest.
///
/// # Format
///
/// One entry per line, digest first:
/// ```text
/// 9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08  amgctl-linux-amd64
/// 60303ae22b998861bce3b28f33eec1be758a213c86c93c076dbe9f558c11c752  amgctl-darwin-arm64
/// ```
///
/// Lines that do not split into exactly two whitespace-separated fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumManifest {
    entries: HashMap<String, String>,
}

impl ChecksumManifest {
    /// Parse manifest text.
    ///
    /// When a file name is listed more than once, the first line wins.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            let mut fields = line.split_whitespace();
            if let (Some(digest), Some(file_name), None) = (fields.next(), fields.next(), fields.next())
            {
                entries.entry(file_name.to_string()).or_insert_with(|| digest.to_string());
            }
        }
        Self {
            entries,
        }
    }

    /// The digest listed for `asset_name`, matched exactly.
    pub fn get(&self, asset_name: &str) -> Option<&str> {
        self.entries.get(asset_name).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Verifies downloaded artifacts against the release's checksum manifest.
///
/// Digests are compared as written in the manifest: the computed digest is
/// lowercase hex, so a manifest listing uppercase hex does not match.
pub struct ChecksumVerifier {
    client: reqwest::Client,
}

impl ChecksumVerifier {
    /// Create a verifier whose manifest request times out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, AmgctlError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()
            .map_err(|e| AmgctlError::Other {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
        })
    }

    /// Compute the lowercase hex SHA-256 of a file.
    ///
    /// The file is hashed in fixed-size chunks rather than read whole.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use amgctl_cli::upgrade::verification::ChecksumVerifier;
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), amgctl_cli::core::AmgctlError> {
    /// let checksum = ChecksumVerifier::compute_sha256(Path::new("/path/to/binary")).await?;
    /// println!("SHA256: {checksum}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn compute_sha256(file_path: &Path) -> Result<String, AmgctlError> {
        debug!("Computing SHA256 checksum for: {}", file_path.display());

        let mut file = File::open(file_path).await?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let read = file.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Download and parse the checksum manifest.
    ///
    /// Transport failures and non-success statuses are
    /// [`AmgctlError::DownloadFailed`].
    pub async fn fetch_manifest(&self, manifest_url: &str) -> Result<ChecksumManifest, AmgctlError> {
        debug!("Fetching checksums from: {manifest_url}");

        let failed = |reason: String| AmgctlError::DownloadFailed {
            url: manifest_url.to_string(),
            reason,
        };

        let response =
            self.client.get(manifest_url).send().await.map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }

        let content = response.text().await.map_err(|e| failed(e.to_string()))?;
        let manifest = ChecksumManifest::parse(&content);
        debug!("Checksum manifest lists {} assets", manifest.len());
        Ok(manifest)
    }

    /// Verify `file_path` against the manifest entry for `asset_name`.
    pub async fn verify_file(
        file_path: &Path,
        manifest: &ChecksumManifest,
        asset_name: &str,
    ) -> Result<(), AmgctlError> {
        let expected = manifest.get(asset_name).ok_or_else(|| AmgctlError::ChecksumEntryMissing {
            asset: asset_name.to_string(),
        })?;

        info!("Verifying checksum for: {asset_name}");
        let actual = Self::compute_sha256(file_path).await?;

        if actual != expected {
            return Err(AmgctlError::ChecksumMismatch {
                asset: asset_name.to_string(),
                expected: expected.to_string(),
                actual,
            });
        }

        info!("Checksum verification successful");
        Ok(())
    }

    /// Fetch the manifest at `manifest_url` and verify `file_path` against it.
    pub async fn verify(
        &self,
        file_path: &Path,
        manifest_url: &str,
        asset_name: &str,
    ) -> Result<(), AmgctlError> {
        let manifest = self.fetch_manifest(manifest_url).await?;
        Self::verify_file(file_path, &manifest, asset_name).await
    }
}
