//! Self-update functionality for amgctl.
//!
//! This module lets `amgctl` replace its own executable with a newer build
//! published on the project's GitHub releases page, without an external
//! package manager.
//!
//! # Update Process Flow
//!
//! ```text
//! 1. Resolve
//!    ├── GET /repos/<owner>/<repo>/releases
//!    └── First stable release (or first release with --prerelease)
//!
//! 2. Decide
//!    └── Stop unless the tag is newer than the running version (or --force)
//!
//! 3. Select
//!    └── Asset named exactly <binary>-<os>-<arch>[.exe | .tar.gz]
//!
//! 4. Download
//!    └── Stream into a private temp directory
//!
//! 5. Verify
//!    ├── Fetch checksums.txt and compare SHA-256 digests
//!    └── Skipped with a warning only if the release has no checksums.txt
//!
//! 6. Extract (archives only)
//!    └── First regular file named <binary> or <binary>.exe
//!
//! 7. Install
//!    ├── Unix: stage <exe>.new, rename over <exe>
//!    └── Windows: move <exe> to <exe>.backup, copy in place, roll back on failure
//! ```
//!
//! Every stage fails fast and nothing is retried. The executable is not
//! touched before step 7, and step 7 never leaves it half-written.
//!
//! # Usage
//!
//! ```bash
//! amgctl update                 # Update to the latest stable release
//! amgctl update --check         # Report whether an update is available
//! amgctl update --prerelease    # Consider prerelease builds too
//! amgctl update --force         # Reinstall even if already current
//! ```
//!
//! # Module Structure
//!
//! - [`version_check`]: Numeric version comparison
//! - [`release`]: Release feed access and candidate selection
//! - [`platform`]: Platform naming and asset selection
//! - [`download`]: Streaming artifact download
//! - [`verification`]: Checksum manifest parsing and SHA-256 verification
//! - [`archive`]: Executable extraction from `.tar.gz` artifacts
//! - [`install`]: Installer strategies and the [`install::FileOps`] seam
//! - [`backup`]: The transient backup used by the backup-swap strategy
//! - [`transaction`]: Per-run temporary directory
//! - [`self_updater`]: The pipeline tying the stages together
//! - [`config`]: Configuration structures and defaults
//!
//! # Error Handling
//!
//! ```rust,no_run
//! use amgctl_cli::upgrade::{SelfUpdater, UpdateOutcome};
//!
//! # async fn example() {
//! let mut updater = SelfUpdater::new();
//! match updater.run().await {
//!     Ok(UpdateOutcome::Updated { to, .. }) => println!("Updated to {to}"),
//!     Ok(UpdateOutcome::UpToDate { .. }) => println!("Already on latest version"),
//!     Err(e) => eprintln!("Update failed: {e}"),
//! }
//! # }
//! ```

pub mod archive;
/// Backup handling for the backup-swap install strategy.
pub mod backup;
/// Configuration structures for upgrade behavior.
pub mod config;
pub mod download;
pub mod install;
pub mod platform;
pub mod release;
/// Core self-update implementation.
pub mod self_updater;
pub mod transaction;
/// Download verification and integrity checking.
pub mod verification;
pub mod version_check;


pub use config::{AssetFormat, UpgradeConfig};
pub use install::{InstallStrategy, Installer};
pub use platform::Platform;
pub use self_updater::{SelfUpdater, UpdateCheck, UpdateOutcome, UpdateStage};
pub use verification::ChecksumVerifier;
pub use version_check::is_newer;
