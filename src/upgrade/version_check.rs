//! Version comparison for release tags.
//!
//! Release tags are compared as plain numeric `major.minor.patch` triples.
//! A leading non-numeric prefix (`v`, `release-`, ...) is stripped, missing
//! trailing components count as zero, and components past the third are
//! ignored. Pre-release or build suffixes are not understood: a tag such as
//! `v1.2.3-rc1` does not parse and is never considered newer.

use std::fmt;

use tracing::debug;

/// A release version reduced to its numeric `(major, minor, patch)` triple.
///
/// Ordering is lexicographic over the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParsedVersion {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl ParsedVersion {
    /// Parse a version tag, returning `None` when any of the first three
    /// components is not a non-negative integer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use amgctl_cli::upgrade::version_check::ParsedVersion;
    ///
    /// let v = ParsedVersion::parse("v1.2").unwrap();
    /// assert_eq!((v.major, v.minor, v.patch), (1, 2, 0));
    /// assert!(ParsedVersion::parse("nightly").is_none());
    /// ```
    pub fn parse(tag: &str) -> Option<Self> {
        let trimmed = strip_prefix(tag.trim());
        if trimmed.is_empty() {
            return None;
        }

        let mut components = [0u64; 3];
        for (slot, part) in components.iter_mut().zip(trimmed.split('.')) {
            *slot = part.parse().ok()?;
        }

        Some(Self {
            major: components[0],
            minor: components[1],
            patch: components[2],
        })
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn strip_prefix(tag: &str) -> &str {
    tag.trim_start_matches(|c: char| !c.is_ascii_digit())
}

/// Whether `candidate` is strictly newer than `current`.
///
/// Returns `false` when the versions are equal, when `candidate` is older,
/// or when either side cannot be parsed. Never panics.
///
/// # Examples
///
/// ```rust
/// use amgctl_cli::upgrade::version_check::is_newer;
///
/// assert!(is_newer("v1.2.4", "1.2.3"));
/// assert!(!is_newer("1.2", "1.2.0"));
/// assert!(!is_newer("garbage", "1.0.0"));
/// ```
pub fn is_newer(candidate: &str, current: &str) -> bool {
    match (ParsedVersion::parse(candidate), ParsedVersion::parse(current)) {
        (Some(candidate), Some(current)) => candidate > current,
        (candidate_parsed, current_parsed) => {
            debug!(
                "Treating {candidate:?} as not newer than {current:?} (candidate parsed: {}, current parsed: {})",
                candidate_parsed.is_some(),
                current_parsed.is_some()
            );
            false
        }
    }
}

/// Format version information for status display.
///
/// Shows the current version and, when a newer tag is known, the tag that
/// would be installed.
pub fn format_version_info(current: &str, latest: Option<&str>) -> String {
    match latest {
        Some(tag) if is_newer(tag, current) => {
            format!("Current version: {current}\nLatest version:  {tag} (update available)")
        }
        _ => format!("Current version: {current} (up to date)"),
    }
}
