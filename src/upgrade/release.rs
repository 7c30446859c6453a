//! Release feed access and candidate selection.
//!
//! The feed is a GitHub-style `GET /repos/<owner>/<repo>/releases` listing,
//! newest first. Its order is trusted: no client-side sorting happens here.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::{CHECKSUMS_ASSET_NAME, GITHUB_ACCEPT_HEADER, user_agent};
use crate::core::AmgctlError;
use crate::upgrade::config::UpgradeConfig;

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// File name of the asset
    pub name: String,
    /// Direct download URL
    pub browser_download_url: String,
}

/// One entry of the release feed.
///
/// Unknown fields in the feed are ignored. `name` is nullable upstream and is
/// read as an empty string in that case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseDescriptor {
    /// Version tag, e.g. `v1.2.3`
    pub tag_name: String,
    /// Human-readable release title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Whether the release is flagged as a prerelease
    #[serde(default)]
    pub prerelease: bool,
    /// Attached assets in feed order
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ReleaseDescriptor {
    /// The release tag, used as the version string.
    pub fn version(&self) -> &str {
        &self.tag_name
    }

    /// Asset whose name is exactly `name`.
    pub fn find_asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| asset.name == name)
    }

    /// The `checksums.txt` asset, if the release publishes one.
    pub fn checksum_asset(&self) -> Option<&ReleaseAsset> {
        self.find_asset(CHECKSUMS_ASSET_NAME)
    }
}

/// Pick the release to consider from a feed listing.
///
/// Without `include_prerelease` this is the first stable release; with it,
/// simply the first release. Returns [`AmgctlError::NoReleaseFound`] when
/// nothing qualifies.
pub fn select_release(
    releases: Vec<ReleaseDescriptor>,
    include_prerelease: bool,
) -> Result<ReleaseDescriptor, AmgctlError> {
    releases.into_iter().find(|release| include_prerelease || !release.prerelease).ok_or(
        AmgctlError::NoReleaseFound {
            include_prerelease,
        },
    )
}

/// Queries the release feed and selects a candidate.
pub struct ReleaseResolver {
    client: reqwest::Client,
    releases_url: String,
}

impl ReleaseResolver {
    /// Build a resolver for the repository described by `config`.
    ///
    /// The HTTP client carries the feed timeout and the headers the GitHub
    /// API expects.
    pub fn new(config: &UpgradeConfig) -> Result<Self, AmgctlError> {
        let client = reqwest::Client::builder()
            .timeout(config.feed_timeout())
            .default_headers(api_headers())
            .build()
            .map_err(|e| AmgctlError::Other {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            releases_url: config.releases_url(),
        })
    }

    /// The listing URL this resolver queries.
    pub fn releases_url(&self) -> &str {
        &self.releases_url
    }

    /// Fetch the full release listing.
    ///
    /// Transport errors, non-success statuses, and bodies that do not decode
    /// as a release array all map to [`AmgctlError::FeedUnavailable`].
    pub async fn fetch_releases(&self) -> Result<Vec<ReleaseDescriptor>, AmgctlError> {
        debug!("Fetching release listing from {}", self.releases_url);

        let feed_error = |reason: String| AmgctlError::FeedUnavailable {
            url: self.releases_url.clone(),
            reason,
        };

        let response = self
            .client
            .get(&self.releases_url)
            .send()
            .await
            .map_err(|e| feed_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(feed_error(format!("HTTP {status}")));
        }

        let releases: Vec<ReleaseDescriptor> = response
            .json()
            .await
            .map_err(|e| feed_error(format!("invalid release listing: {e}")))?;

        debug!("Release feed returned {} releases", releases.len());
        Ok(releases)
    }

    /// Fetch the listing and select a candidate per the prerelease policy.
    pub async fn resolve(&self, include_prerelease: bool) -> Result<ReleaseDescriptor, AmgctlError> {
        let releases = self.fetch_releases().await?;
        let release = select_release(releases, include_prerelease)?;
        info!(
            "Selected release {} (prerelease: {}, {} assets)",
            release.tag_name,
            release.prerelease,
            release.assets.len()
        );
        Ok(release)
    }
}

fn api_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT_HEADER));
    if let Ok(agent) = HeaderValue::from_str(&user_agent()) {
        headers.insert(USER_AGENT, agent);
    }
    headers
}
