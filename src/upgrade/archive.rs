use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::{debug, info};

use crate::constants::ARCHIVE_SUFFIX;
use crate::core::AmgctlError;

/// Whether `file_name` names a gzip'd tar artifact.
pub fn is_archive(file_name: &str) -> bool {
    file_name.ends_with(ARCHIVE_SUFFIX)
}

/// Return the executable contained in `artifact`.
///
/// Artifacts whose file name does not end in `.tar.gz` are raw binaries and
/// are returned unchanged. For archives, entries are scanned in order and the
/// first regular file whose name ends with `binary_name` (or
/// `binary_name.exe`) is written into `destination_dir` under that name.
///
/// A stream that ends without a match, or cannot be decoded, yields
/// [`AmgctlError::BinaryNotInArchive`].
pub fn extract_if_needed(
    artifact: &Path,
    destination_dir: &Path,
    binary_name: &str,
) -> Result<PathBuf, AmgctlError> {
    let is_tarball = artifact.file_name().is_some_and(|name| is_archive(&name.to_string_lossy()));
    if !is_tarball {
        return Ok(artifact.to_path_buf());
    }

    debug!("Extracting {binary_name} from {}", artifact.display());
    let unreadable = |reason: String| AmgctlError::BinaryNotInArchive {
        archive: artifact.to_path_buf(),
        binary: binary_name.to_string(),
        reason: Some(reason),
    };

    std::fs::create_dir_all(destination_dir)?;
    let file = File::open(artifact)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    let windows_name = format!("{binary_name}.exe");

    for entry in archive.entries().map_err(|e| unreadable(e.to_string()))? {
        let mut entry = entry.map_err(|e| unreadable(e.to_string()))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let entry_path = entry.path().map_err(|e| unreadable(e.to_string()))?.into_owned();
        let entry_name = entry_path.to_string_lossy();
        let output_name = if entry_name.ends_with(&windows_name) {
            windows_name.as_str()
        } else if entry_name.ends_with(binary_name) {
            binary_name
        } else {
            continue;
        };

        let output = destination_dir.join(output_name);
        entry.unpack(&output).map_err(|e| unreadable(e.to_string()))?;
        info!("Extracted {} to {}", entry_path.display(), output.display());
        return Ok(output);
    }

    Err(AmgctlError::BinaryNotInArchive {
        archive: artifact.to_path_buf(),
        binary: binary_name.to_string(),
        reason: None,
    })
}
