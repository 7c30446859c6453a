use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::core::AmgctlError;

/// Scratch space for one update run.
///
/// Owns a private temporary directory named `<binary>-update-XXXX` under the
/// OS temp root. Downloads and extracted binaries live there; the directory
/// and everything in it is removed when the transaction is dropped, whether
/// the run succeeded or not.
#[derive(Debug)]
pub struct InstallTransaction {
    dir: TempDir,
}

impl InstallTransaction {
    /// Create the temporary directory for a run updating `binary_name`.
    pub fn new(binary_name: &str) -> Result<Self, AmgctlError> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("{binary_name}-update-"))
            .tempdir()
            .map_err(|e| AmgctlError::Other {
                message: format!("Failed to create temporary directory: {e}"),
            })?;
        debug!("Created update workspace at {}", dir.path().display());
        Ok(Self {
            dir,
        })
    }

    /// Root of the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where a downloaded file named `file_name` is stored.
    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.dir.path().join(file_name)
    }

    /// Directory archives are extracted into.
    pub fn extraction_dir(&self) -> PathBuf {
        self.dir.path().join("extracted")
    }
}
