use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::BACKUP_SUFFIX;
use crate::upgrade::install::{FileOps, sibling_path};

/// Manages the transient backup of the executable during a backup-swap install.
///
/// The backup is made by *renaming* the executable to `<exe>.backup` rather
/// than copying it. On Windows a running executable cannot be overwritten or
/// deleted, but it can be renamed, which vacates its path for the new binary.
///
/// The backup only exists for the duration of one install: it is removed on
/// success and renamed back on failure. If that rename fails too, the file is
/// left in place for manual recovery.
///
/// # Examples
///
/// ```rust,no_run
/// use amgctl_cli::upgrade::backup::BackupManager;
/// use amgctl_cli::upgrade::install::StdFileOps;
/// use std::path::PathBuf;
///
/// # fn example() -> std::io::Result<()> {
/// let ops = StdFileOps;
/// let manager = BackupManager::new(&ops, PathBuf::from(r"C:\tools\amgctl.exe"));
/// assert!(manager.backup_path().ends_with("amgctl.exe.backup"));
///
/// manager.create_backup()?;
/// // ... copy the new binary into place ...
/// manager.cleanup_backup()?;
/// # Ok(())
/// # }
/// ```
pub struct BackupManager<'a, F: FileOps + ?Sized> {
    ops: &'a F,
    /// Path to the executable being replaced.
    original_path: PathBuf,
    /// Path the executable is moved to.
    backup_path: PathBuf,
}

impl<'a, F: FileOps + ?Sized> BackupManager<'a, F> {
    /// Create a manager for `executable_path`; the backup lives beside it.
    pub fn new(ops: &'a F, executable_path: PathBuf) -> Self {
        let backup_path = sibling_path(&executable_path, BACKUP_SUFFIX);
        Self {
            ops,
            original_path: executable_path,
            backup_path,
        }
    }

    /// Where the executable is moved while the new binary is copied in.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Whether a backup file is present.
    pub fn backup_exists(&self) -> bool {
        self.ops.exists(&self.backup_path)
    }

    /// Move the executable to the backup path.
    ///
    /// A stale backup from an earlier interrupted run is removed first. On
    /// error the executable has not moved.
    pub fn create_backup(&self) -> io::Result<()> {
        if self.backup_exists() {
            debug!("Removing stale backup at {}", self.backup_path.display());
            self.ops.remove_file(&self.backup_path)?;
        }

        info!(
            "Moving {} aside to {}",
            self.original_path.display(),
            self.backup_path.display()
        );
        self.ops.rename(&self.original_path, &self.backup_path)
    }

    /// Move the backup back to the executable path.
    ///
    /// Any partially written file at the executable path is removed first.
    /// The returned error is the one from the rename, the step that actually
    /// restores the executable.
    pub fn restore_backup(&self) -> io::Result<()> {
        if self.ops.exists(&self.original_path)
            && let Err(e) = self.ops.remove_file(&self.original_path)
        {
            warn!("Failed to remove partial binary at {}: {e}", self.original_path.display());
        }

        self.ops.rename(&self.backup_path, &self.original_path)?;
        info!("Restored previous binary at {}", self.original_path.display());
        Ok(())
    }

    /// Delete the backup after a successful install.
    pub fn cleanup_backup(&self) -> io::Result<()> {
        if self.backup_exists() {
            debug!("Removing backup at {}", self.backup_path.display());
            self.ops.remove_file(&self.backup_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrade::install::StdFileOps;
    use tempfile::TempDir;

    #[test]
    fn test_backup_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let exe = temp_dir.path().join("amgctl");
        std::fs::write(&exe, b"original").unwrap();

        let ops = StdFileOps;
        let manager = BackupManager::new(&ops, exe.clone());
        assert!(!manager.backup_exists());

        manager.create_backup().unwrap();
        assert!(manager.backup_exists());
        assert!(!exe.exists());

        std::fs::write(&exe, b"partial").unwrap();
        manager.restore_backup().unwrap();
        assert_eq!(std::fs::read(&exe).unwrap(), b"original");
        assert!(!manager.backup_exists());

        manager.create_backup().unwrap();
        std::fs::write(&exe, b"new").unwrap();
        manager.cleanup_backup().unwrap();
        assert!(!manager.backup_exists());
        assert_eq!(std::fs::read(&exe).unwrap(), b"new");
    }

    #[test]
    fn test_create_backup_replaces_stale_backup() {
        let temp_dir = TempDir::new().unwrap();
        let exe = temp_dir.path().join("amgctl");
        std::fs::write(&exe, b"current").unwrap();

        let ops = StdFileOps;
        let manager = BackupManager::new(&ops, exe);
        std::fs::write(manager.backup_path(), b"stale").unwrap();

        manager.create_backup().unwrap();
        assert_eq!(std::fs::read(manager.backup_path()).unwrap(), b"current");
    }

    #[test]
    fn test_cleanup_without_backup_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let ops = StdFileOps;
        let manager = BackupManager::new(&ops, temp_dir.path().join("amgctl"));
        manager.cleanup_backup().unwrap();
    }
}
