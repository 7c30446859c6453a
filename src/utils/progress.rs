//! Progress indicators for amgctl operations
//!
//! Thin wrapper over `indicatif` with a consistent style for download bars.
//! Bars are hidden when progress is disabled, so callers never need to
//! branch on the setting themselves.
//!
//! # Environment Variables
//!
//! - `AMGCTL_NO_PROGRESS`: Set to any value to disable all progress indicators
//!
//! Progress is also disabled when stderr is not a terminal (CI logs, pipes)
//! and when the `--no-progress` flag is given.

use std::io::IsTerminal;

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

use crate::constants::NO_PROGRESS_ENV;

/// Checks if progress bars should be disabled by the environment.
///
/// True when `AMGCTL_NO_PROGRESS` is set to any value or stderr is not a
/// terminal.
pub fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some() || !std::io::stderr().is_terminal()
}

/// A progress bar with consistent styling.
///
/// # Examples
///
/// ```rust
/// use amgctl_cli::utils::progress::ProgressBar;
///
/// let progress = ProgressBar::download(Some(1024), false);
/// progress.inc(512);
/// progress.finish_and_clear();
/// ```
#[derive(Clone)]
pub struct ProgressBar {
    inner: IndicatifBar,
}

impl ProgressBar {
    /// Creates a byte-counting download bar.
    ///
    /// Hidden when `enabled` is false, when the environment disables
    /// progress, or when `total_bytes` is unknown.
    pub fn download(total_bytes: Option<u64>, enabled: bool) -> Self {
        let inner = match total_bytes {
            Some(len) if enabled && !is_progress_disabled() => {
                let bar = IndicatifBar::new(len);
                bar.set_style(ProgressStyle::download());
                bar
            }
            _ => IndicatifBar::hidden(),
        };
        Self {
            inner,
        }
    }

    /// Whether the bar draws nothing.
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    /// Sets the prefix shown before the bar.
    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.inner.set_prefix(prefix.into());
    }

    /// Advances the bar by `delta` units.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Current position of the bar.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Finishes the bar and removes it from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

/// Progress style utilities for consistent amgctl progress bar appearance.
pub struct ProgressStyle;

impl ProgressStyle {
    /// Style for byte transfers: `prefix [━━━━╸   ] 1.2 MiB/4.0 MiB (3s)`.
    pub fn download() -> IndicatifStyle {
        IndicatifStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .map(|style| style.progress_chars("━╸━"))
            .unwrap_or_else(|_| IndicatifStyle::default_bar())
    }
}
