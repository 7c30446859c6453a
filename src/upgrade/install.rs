//! Replacing the running executable.
//!
//! Two strategies exist because platforms disagree about replacing a file
//! that is currently executing:
//!
//! - [`AtomicRenameInstaller`] (Unix): stage the new binary next to the
//!   executable as `<exe>.new`, then `rename` it over the executable. The
//!   rename is atomic, so the path always holds either the old or the new
//!   binary.
//! - [`BackupSwapInstaller`] (Windows): a running `.exe` cannot be
//!   overwritten but can be renamed, so the executable is moved aside to
//!   `<exe>.backup`, the new binary is copied into the vacated path, and the
//!   backup is renamed back if anything fails.
//!
//! Both strategies reapply the original executable's permissions to the new
//! file and perform every filesystem call through [`FileOps`], which lets
//! tests inject failures at any step.
//!
//! # Examples
//!
//! ```rust,no_run
//! use amgctl_cli::upgrade::install::InstallStrategy;
//! use std::path::Path;
//!
//! let installer = InstallStrategy::for_current_platform().installer();
//! installer.install(Path::new("/tmp/amgctl-new"), Path::new("/usr/local/bin/amgctl"))?;
//! # Ok::<(), amgctl_cli::core::AmgctlError>(())
//! ```

use std::ffi::OsString;
use std::fs::Permissions;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::STAGED_SUFFIX;
use crate::core::AmgctlError;
use crate::upgrade::backup::BackupManager;

/// Filesystem operations used by the installers.
pub trait FileOps: Send + Sync {
    /// Copy `from` to `to`, replacing `to` if it exists.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
    /// Rename `from` to `to`.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    /// Read a file's permissions.
    fn permissions(&self, path: &Path) -> io::Result<Permissions>;
    /// Set a file's permissions.
    fn set_permissions(&self, path: &Path, permissions: Permissions) -> io::Result<()>;
    /// Whether a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// [`FileOps`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn permissions(&self, path: &Path) -> io::Result<Permissions> {
        std::fs::metadata(path).map(|metadata| metadata.permissions())
    }

    fn set_permissions(&self, path: &Path, permissions: Permissions) -> io::Result<()> {
        std::fs::set_permissions(path, permissions)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Replaces an executable on disk with a new binary.
pub trait Installer: Send + Sync {
    /// Install `new_binary` at `current_executable`.
    ///
    /// On error the executable path still holds the original bytes, except
    /// for [`AmgctlError::RollbackFailed`], where the original survives at
    /// the reported backup path.
    fn install(&self, new_binary: &Path, current_executable: &Path) -> Result<(), AmgctlError>;
}

/// The installation strategies, chosen once per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Stage as `<exe>.new` and rename over the executable.
    AtomicRename,
    /// Move the executable to `<exe>.backup`, copy in place, roll back on failure.
    BackupSwap,
}

impl InstallStrategy {
    /// [`BackupSwap`](Self::BackupSwap) on Windows, [`AtomicRename`](Self::AtomicRename) elsewhere.
    pub const fn for_current_platform() -> Self {
        if cfg!(windows) {
            Self::BackupSwap
        } else {
            Self::AtomicRename
        }
    }

    /// An installer for this strategy using the real filesystem.
    pub fn installer(self) -> Box<dyn Installer> {
        match self {
            Self::AtomicRename => Box::new(AtomicRenameInstaller::new(StdFileOps)),
            Self::BackupSwap => Box::new(BackupSwapInstaller::new(StdFileOps)),
        }
    }
}

/// `path` with `suffix` appended to its file name.
pub(crate) fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn install_failed(path: &Path, reason: impl Into<String>) -> AmgctlError {
    AmgctlError::InstallFailed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Installs by staging a sibling file and renaming it over the executable.
#[derive(Debug, Default)]
pub struct AtomicRenameInstaller<F: FileOps = StdFileOps> {
    ops: F,
}

impl<F: FileOps> AtomicRenameInstaller<F> {
    /// Create an installer that performs filesystem calls through `ops`.
    pub const fn new(ops: F) -> Self {
        Self {
            ops,
        }
    }

    fn discard_staged(&self, staged: &Path) {
        if self.ops.exists(staged)
            && let Err(e) = self.ops.remove_file(staged)
        {
            warn!("Failed to remove staged binary {}: {e}", staged.display());
        }
    }

    fn stage_and_swap(
        &self,
        new_binary: &Path,
        current_executable: &Path,
        staged: &Path,
        permissions: Permissions,
    ) -> io::Result<()> {
        self.ops.copy(new_binary, staged)?;
        self.ops.set_permissions(staged, permissions)?;
        self.ops.rename(staged, current_executable)
    }
}

impl<F: FileOps> Installer for AtomicRenameInstaller<F> {
    fn install(&self, new_binary: &Path, current_executable: &Path) -> Result<(), AmgctlError> {
        let permissions = self.ops.permissions(current_executable).map_err(|e| {
            install_failed(current_executable, format!("cannot read permissions: {e}"))
        })?;

        let staged = sibling_path(current_executable, STAGED_SUFFIX);
        if self.ops.exists(&staged) {
            debug!("Removing stale staged binary at {}", staged.display());
            self.ops.remove_file(&staged).map_err(|e| {
                install_failed(
                    current_executable,
                    format!("cannot remove stale {}: {e}", staged.display()),
                )
            })?;
        }

        debug!("Staging {} at {}", new_binary.display(), staged.display());
        if let Err(e) = self.stage_and_swap(new_binary, current_executable, &staged, permissions) {
            self.discard_staged(&staged);
            return Err(install_failed(current_executable, e.to_string()));
        }

        info!("Installed new binary at {}", current_executable.display());
        Ok(())
    }
}

/// Installs by moving the executable aside and copying into its place.
#[derive(Debug, Default)]
pub struct BackupSwapInstaller<F: FileOps = StdFileOps> {
    ops: F,
}

impl<F: FileOps> BackupSwapInstaller<F> {
    /// Create an installer that performs filesystem calls through `ops`.
    pub const fn new(ops: F) -> Self {
        Self {
            ops,
        }
    }

    fn copy_into_place(
        &self,
        new_binary: &Path,
        current_executable: &Path,
        permissions: Permissions,
    ) -> io::Result<()> {
        self.ops.copy(new_binary, current_executable)?;
        self.ops.set_permissions(current_executable, permissions)
    }
}

impl<F: FileOps> Installer for BackupSwapInstaller<F> {
    fn install(&self, new_binary: &Path, current_executable: &Path) -> Result<(), AmgctlError> {
        let permissions = self.ops.permissions(current_executable).map_err(|e| {
            install_failed(current_executable, format!("cannot read permissions: {e}"))
        })?;

        let backup = BackupManager::new(&self.ops, current_executable.to_path_buf());
        backup.create_backup().map_err(|e| {
            install_failed(current_executable, format!("cannot move executable aside: {e}"))
        })?;

        match self.copy_into_place(new_binary, current_executable, permissions) {
            Ok(()) => {
                if let Err(e) = backup.cleanup_backup() {
                    warn!("Installed, but failed to remove {}: {e}", backup.backup_path().display());
                }
                info!("Installed new binary at {}", current_executable.display());
                Ok(())
            }
            Err(install_error) => {
                warn!("Install failed ({install_error}); restoring previous binary");
                match backup.restore_backup() {
                    Ok(()) => Err(install_failed(current_executable, install_error.to_string())),
                    Err(rollback_error) => Err(AmgctlError::RollbackFailed {
                        path: current_executable.to_path_buf(),
                        backup: backup.backup_path().to_path_buf(),
                        install_error: install_error.to_string(),
                        rollback_error: rollback_error.to_string(),
                    }),
                }
            }
        }
    }
}
