//! Test doubles for the install stage.

use std::fs::Permissions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::AmgctlError;
use crate::upgrade::install::{FileOps, Installer, StdFileOps};

/// A filesystem operation that [`FaultyFileOps`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// [`FileOps::copy`]
    Copy,
    /// [`FileOps::rename`]
    Rename,
    /// [`FileOps::remove_file`]
    RemoveFile,
    /// [`FileOps::set_permissions`]
    SetPermissions,
}

/// Real filesystem operations with injected failures.
///
/// A failing copy first writes a truncated file at the destination, the way
/// a copy interrupted by a full disk would.
#[derive(Debug, Default)]
pub struct FaultyFileOps {
    failing: Vec<FileOp>,
    renames_before_failure: Option<usize>,
    renames: AtomicUsize,
}

impl FaultyFileOps {
    /// Fail every call to `op`.
    pub fn failing(op: FileOp) -> Self {
        Self {
            failing: vec![op],
            ..Self::default()
        }
    }

    /// Also fail `op`.
    pub fn and_failing(mut self, op: FileOp) -> Self {
        self.failing.push(op);
        self
    }

    /// Let the first `count` renames succeed and fail every later one.
    pub fn fail_rename_after(mut self, count: usize) -> Self {
        self.renames_before_failure = Some(count);
        self
    }

    fn fails(&self, op: FileOp) -> bool {
        self.failing.contains(&op)
    }

    fn injected(op: FileOp) -> io::Error {
        io::Error::other(format!("injected {op:?} failure"))
    }
}

impl FileOps for FaultyFileOps {
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        if self.fails(FileOp::Copy) {
            let bytes = std::fs::read(from)?;
            std::fs::write(to, &bytes[..bytes.len() / 2])?;
            return Err(Self::injected(FileOp::Copy));
        }
        StdFileOps.copy(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let call = self.renames.fetch_add(1, Ordering::SeqCst);
        let over_budget = self.renames_before_failure.is_some_and(|budget| call >= budget);
        if self.fails(FileOp::Rename) || over_budget {
            return Err(Self::injected(FileOp::Rename));
        }
        StdFileOps.rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.fails(FileOp::RemoveFile) {
            return Err(Self::injected(FileOp::RemoveFile));
        }
        StdFileOps.remove_file(path)
    }

    fn permissions(&self, path: &Path) -> io::Result<Permissions> {
        StdFileOps.permissions(path)
    }

    fn set_permissions(&self, path: &Path, permissions: Permissions) -> io::Result<()> {
        if self.fails(FileOp::SetPermissions) {
            return Err(Self::injected(FileOp::SetPermissions));
        }
        StdFileOps.set_permissions(path, permissions)
    }

    fn exists(&self, path: &Path) -> bool {
        StdFileOps.exists(path)
    }
}

/// An [`Installer`] that records its calls and copies the new binary into place.
///
/// Clones share the same call log, so a test can keep one handle while the
/// updater owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingInstaller {
    calls: std::sync::Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>,
}

impl RecordingInstaller {
    /// Create an installer with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`Installer::install`] was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    /// Bytes of the binary handed to each call, with the target path.
    pub fn calls(&self) -> Vec<(PathBuf, Vec<u8>)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl Installer for RecordingInstaller {
    fn install(&self, new_binary: &Path, current_executable: &Path) -> Result<(), AmgctlError> {
        let bytes = std::fs::read(new_binary)?;
        std::fs::write(current_executable, &bytes)?;
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((current_executable.to_path_buf(), bytes));
        }
        Ok(())
    }
}
