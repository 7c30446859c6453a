//! Test utilities for amgctl
//!
//! Shared helpers for unit and integration tests: one-time logging setup and
//! test doubles for the install stage.
//!
//! # Example
//!
//! ```rust,no_run
//! use amgctl_cli::test_utils::{FaultyFileOps, FileOp, init_test_logging};
//! use amgctl_cli::upgrade::install::{AtomicRenameInstaller, Installer};
//! use std::path::Path;
//!
//! init_test_logging(None);
//! let installer = AtomicRenameInstaller::new(FaultyFileOps::failing(FileOp::Copy));
//! assert!(installer.install(Path::new("new"), Path::new("current")).is_err());
//! ```

mod fakes;

pub use fakes::{FaultyFileOps, FileOp, RecordingInstaller};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
