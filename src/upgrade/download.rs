use std::path::Path;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::constants::user_agent;
use crate::core::AmgctlError;
use crate::utils::progress::ProgressBar;

/// Fetches release assets to local files.
///
/// The body is streamed to disk chunk by chunk, so memory use does not grow
/// with the artifact size. There is no resume and no retry: any failure is
/// reported as [`AmgctlError::DownloadFailed`].
///
/// # Examples
///
/// ```rust,no_run
/// use amgctl_cli::upgrade::download::Downloader;
/// use std::path::Path;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), amgctl_cli::core::AmgctlError> {
/// let downloader = Downloader::new(Duration::from_secs(300))?.with_progress(true);
/// let bytes = downloader
///     .download("https://example.com/amgctl-linux-amd64", Path::new("/tmp/amgctl"))
///     .await?;
/// println!("Downloaded {bytes} bytes");
/// # Ok(())
/// # }
/// ```
pub struct Downloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl Downloader {
    /// Create a downloader whose requests time out after `timeout`.
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
            show_progress: false,
        })
    }

    /// Show a download bar while transferring.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download `url` into a newly created file at `destination`.
    ///
    /// Returns the number of bytes written.
    pub async fn download(&self, url: &str, destination: &Path) -> Result<u64, AmgctlError> {
        let failed = |reason: String| AmgctlError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        debug!("Downloading {url} to {}", destination.display());
        let mut response = self.client.get(url).send().await.map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP {status}")));
        }

        let mut file = File::create(destination)
            .await
            .map_err(|e| failed(format!("cannot create {}: {e}", destination.display())))?;

        let progress = ProgressBar::download(response.content_length(), self.show_progress);
        progress.set_prefix("Downloading");

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| failed(e.to_string()))? {
            file.write_all(&chunk)
                .await
                .map_err(|e| failed(format!("write to {} failed: {e}", destination.display())))?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }

        file.flush()
            .await
            .map_err(|e| failed(format!("write to {} failed: {e}", destination.display())))?;
        progress.finish_and_clear();

        info!("Downloaded {written} bytes from {url}");
        Ok(written)
    }
}
