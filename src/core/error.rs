//! Error handling for amgctl
//!
//! This module provides the error type shared by every stage of the self-update
//! pipeline, plus the user-facing [`ErrorContext`] wrapper used by the CLI to
//! print coloured messages with actionable suggestions.
//!
//! # Architecture
//!
//! - [`AmgctlError`] - Enumerated failure modes, one variant per pipeline stage
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for CLI users
//!
//! Library code returns `Result<T, AmgctlError>` so callers (and tests) can match
//! on the exact failure. The CLI layer wraps those errors in [`anyhow::Error`]
//! and converts them with [`user_friendly_error`](super::user_friendly_error)
//! right before exiting.
//!
//! # Examples
//!
//! ```rust,no_run
//! use amgctl_cli::core::{AmgctlError, ErrorContext};
//!
//! let error = AmgctlError::NoReleaseFound {
//!     include_prerelease: false,
//! };
//! let context = ErrorContext::new(error)
//!     .with_suggestion("Retry with --prerelease to include pre-release builds");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for amgctl operations.
///
/// Variants map one-to-one onto the stages of a self-update run. Every stage
/// surfaces its error immediately; nothing is retried.
///
/// # Error Categories
///
/// ## Release feed
/// - [`FeedUnavailable`] - Transport failure or non-success status from the listing
/// - [`NoReleaseFound`] - Listing empty, or nothing passes the prerelease filter
///
/// ## Asset selection and transfer
/// - [`NoAssetForPlatform`] - No asset named exactly like this platform's build
/// - [`DownloadFailed`] - Artifact or manifest could not be fetched or written
///
/// ## Integrity
/// - [`ChecksumEntryMissing`] - `checksums.txt` has no line for the asset
/// - [`ChecksumMismatch`] - Artifact digest differs from the manifest
///
/// ## Payload and installation
/// - [`BinaryNotInArchive`] - `.tar.gz` artifact holds no matching executable
/// - [`InstallFailed`] - Replacing the executable failed; original left intact
/// - [`RollbackFailed`] - Install failed and restoring the backup failed too
///
/// [`FeedUnavailable`]: AmgctlError::FeedUnavailable
/// [`NoReleaseFound`]: AmgctlError::NoReleaseFound
/// [`NoAssetForPlatform`]: AmgctlError::NoAssetForPlatform
/// [`DownloadFailed`]: AmgctlError::DownloadFailed
/// [`ChecksumEntryMissing`]: AmgctlError::ChecksumEntryMissing
/// [`ChecksumMismatch`]: AmgctlError::ChecksumMismatch
/// [`BinaryNotInArchive`]: AmgctlError::BinaryNotInArchive
/// [`InstallFailed`]: AmgctlError::InstallFailed
/// [`RollbackFailed`]: AmgctlError::RollbackFailed
#[derive(Error, Debug)]
pub enum AmgctlError {
    /// The release listing could not be retrieved or decoded.
    ///
    /// Raised on connection errors, timeouts, non-2xx responses (including
    /// GitHub API rate limiting), and bodies that are not a release array.
    #[error("Release feed unavailable at {url}: {reason}")]
    FeedUnavailable {
        /// The listing URL that was requested
        url: String,
        /// Transport error, HTTP status, or decode failure
        reason: String,
    },

    /// The listing contained no release acceptable under the prerelease policy.
    #[error("No suitable release found in the release feed")]
    NoReleaseFound {
        /// Whether prerelease-flagged releases were eligible
        include_prerelease: bool,
    },

    /// The selected release has no asset named for this platform.
    ///
    /// This is a hard abort even under `--force`: the release is unusable
    /// here, not merely "not newer".
    #[error("No release asset '{asset}' for platform {platform}")]
    NoAssetForPlatform {
        /// The exact asset file name that was expected
        asset: String,
        /// The `os/arch` pair of the running process
        platform: String,
    },

    /// Fetching a release asset failed.
    #[error("Download of {url} failed: {reason}")]
    DownloadFailed {
        /// The URL being downloaded
        url: String,
        /// Transport error, HTTP status, or local write failure
        reason: String,
    },

    /// The checksum manifest has no entry for the downloaded asset.
    #[error("Checksum not found for {asset} in checksums.txt")]
    ChecksumEntryMissing {
        /// The asset file name used as the lookup key
        asset: String,
    },

    /// The downloaded artifact does not match its published digest.
    #[error("Checksum mismatch for {asset}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The asset file name that was verified
        asset: String,
        /// Digest published in the manifest
        expected: String,
        /// Digest computed from the downloaded bytes
        actual: String,
    },

    /// A `.tar.gz` artifact did not contain the executable.
    #[error("Binary '{binary}' not found in archive {}", .archive.display())]
    BinaryNotInArchive {
        /// The archive that was scanned
        archive: PathBuf,
        /// The executable base name that was searched for
        binary: String,
        /// Decoder failure, if the stream was unreadable
        reason: Option<String>,
    },

    /// Installing the new executable failed; the original is intact.
    #[error("Failed to install new binary at {}: {reason}", .path.display())]
    InstallFailed {
        /// The executable path being replaced
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Installing failed and the automatic rollback failed as well.
    ///
    /// The previous executable survives at `backup`; the operator must move
    /// it back by hand.
    #[error(
        "Failed to install new binary at {}: {install_error}; rollback from {} also failed: {rollback_error}",
        .path.display(),
        .backup.display()
    )]
    RollbackFailed {
        /// The executable path being replaced
        path: PathBuf,
        /// Where the previous executable was moved
        backup: PathBuf,
        /// The error that triggered the rollback
        install_error: String,
        /// The error from the rollback rename
        rollback_error: String,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// IO error outside a specific pipeline stage
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl AmgctlError {
    /// Whether this error came out of the install stage.
    ///
    /// Both [`InstallFailed`](Self::InstallFailed) and
    /// [`RollbackFailed`](Self::RollbackFailed) qualify.
    #[must_use]
    pub const fn is_install_failure(&self) -> bool {
        matches!(self, Self::InstallFailed { .. } | Self::RollbackFailed { .. })
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// Pairs an [`AmgctlError`] with optional details and a suggestion so the CLI
/// can tell the operator what happened and what to do next.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: AmgctlError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from an [`AmgctlError`].
    #[must_use]
    pub const fn new(error: AmgctlError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}
