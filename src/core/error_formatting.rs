//! Error formatting utilities for amgctl
//!
//! Converts internal errors into clear, actionable messages for the operator.

use super::*;

/// Keywords that indicate network-related errors
const NETWORK_ERROR_KEYWORDS: &[&str] = &["network", "connection", "timeout", "timed out"];

/// Keywords that indicate permission-related errors
const PERMISSION_ERROR_KEYWORDS: &[&str] = &["permission", "denied", "access"];

/// Convert any error into a user-friendly format with contextual suggestions
///
/// Walks the error chain looking for an [`AmgctlError`] (errors wrapped by
/// `anyhow` context are found too) and falls back to keyword matching on the
/// message for everything else.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut current_error: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(amgctl_error) = current_error.downcast_ref::<AmgctlError>() {
            return create_error_context(amgctl_error);
        }

        match current_error.source() {
            Some(source) => current_error = source,
            None => break,
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(AmgctlError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Re-run with sufficient privileges (e.g. sudo) or reinstall to a user-writable directory")
        .with_details(format!("IO error: {io_error}"));
    }

    let error_msg = format!("{error:#}");

    if NETWORK_ERROR_KEYWORDS.iter().any(|&keyword| error_msg.contains(keyword)) {
        return ErrorContext::new(AmgctlError::Other {
            message: error_msg.clone(),
        })
        .with_suggestion("Check your internet connection and try again")
        .with_details("A network operation failed. Please verify your connection and retry.");
    }

    if PERMISSION_ERROR_KEYWORDS.iter().any(|&keyword| error_msg.contains(keyword)) {
        return ErrorContext::new(AmgctlError::Other {
            message: error_msg.clone(),
        })
        .with_suggestion("Check file permissions and try running with appropriate privileges")
        .with_details("Permission was denied for the requested operation.");
    }

    ErrorContext::new(AmgctlError::Other {
        message: error_msg,
    })
    .with_suggestion("Check the error message above for more details")
}

/// Create a user-friendly error context from an [`AmgctlError`]
pub fn create_error_context(error: &AmgctlError) -> ErrorContext {
    match error {
        AmgctlError::FeedUnavailable {
            url,
            reason,
        } => ErrorContext::new(AmgctlError::FeedUnavailable {
            url: url.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Check your internet connection; if GitHub is rate limiting you, wait an hour and retry")
        .with_details("The release listing could not be fetched, so no update was attempted"),
        AmgctlError::NoReleaseFound {
            include_prerelease,
        } => {
            let ctx = ErrorContext::new(AmgctlError::NoReleaseFound {
                include_prerelease: *include_prerelease,
            });
            if *include_prerelease {
                ctx.with_details("The release feed is empty")
            } else {
                ctx.with_details("Only pre-release builds are published")
                    .with_suggestion("Run 'amgctl update --prerelease' to include pre-release builds")
            }
        }
        AmgctlError::NoAssetForPlatform {
            asset,
            platform,
        } => ErrorContext::new(AmgctlError::NoAssetForPlatform {
            asset: asset.clone(),
            platform: platform.clone(),
        })
        .with_suggestion("Build amgctl from source for this platform, or download a matching binary manually")
        .with_details(format!("The release does not publish a build for {platform}")),
        AmgctlError::DownloadFailed {
            url,
            reason,
        } => ErrorContext::new(AmgctlError::DownloadFailed {
            url: url.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Check your internet connection and free disk space in the temp directory, then retry")
        .with_details("The current executable was not modified"),
        AmgctlError::ChecksumEntryMissing {
            asset,
        } => ErrorContext::new(AmgctlError::ChecksumEntryMissing {
            asset: asset.clone(),
        })
        .with_suggestion("The release is incomplete; wait for the maintainers to fix it or pick another release")
        .with_details("checksums.txt is published but does not list this platform's asset"),
        AmgctlError::ChecksumMismatch {
            asset,
            expected,
            actual,
        } => ErrorContext::new(AmgctlError::ChecksumMismatch {
            asset: asset.clone(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
        .with_suggestion("Retry the update; if it keeps failing, report the release as corrupted")
        .with_details("The downloaded file does not match the published SHA-256 digest and was discarded"),
        AmgctlError::BinaryNotInArchive {
            archive,
            binary,
            reason,
        } => {
            let ctx = ErrorContext::new(AmgctlError::BinaryNotInArchive {
                archive: archive.clone(),
                binary: binary.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("Report the release archive as malformed");
            match reason {
                Some(reason) => ctx.with_details(format!("Archive could not be read: {reason}")),
                None => ctx.with_details(format!("No regular file named '{binary}' in the archive")),
            }
        }
        AmgctlError::InstallFailed {
            path,
            reason,
        } => ErrorContext::new(AmgctlError::InstallFailed {
            path: path.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Check write permissions on the install directory; re-run with sudo if amgctl is installed system-wide")
        .with_details(format!("{} still contains the previous version", path.display())),
        AmgctlError::RollbackFailed {
            path,
            backup,
            install_error,
            rollback_error,
        } => ErrorContext::new(AmgctlError::RollbackFailed {
            path: path.clone(),
            backup: backup.clone(),
            install_error: install_error.clone(),
            rollback_error: rollback_error.clone(),
        })
        .with_suggestion(format!(
            "Restore the previous version manually: move '{}' back to '{}'",
            backup.display(),
            path.display()
        ))
        .with_details("Manual recovery is required: the executable path may be empty"),
        AmgctlError::ConfigError {
            message,
        } => ErrorContext::new(AmgctlError::ConfigError {
            message: message.clone(),
        })
        .with_suggestion("Check the syntax of your amgctl config file (TOML)"),
        _ => ErrorContext::new(AmgctlError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Check the error message above for more details"),
    }
}
