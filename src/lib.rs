//! amgctl - AMG control CLI
//!
//! This crate holds the self-update subsystem of `amgctl`: discovering a
//! newer build on the project's GitHub releases page, verifying it, and
//! replacing the running executable in place without an external package
//! manager.
//!
//! # Architecture Overview
//!
//! An update is a strict pipeline, each stage failing fast:
//!
//! ```text
//! resolve release → compare versions → select asset → download
//!     → verify checksum → extract (archives) → install
//! ```
//!
//! The executable on disk is never touched before the install stage, and the
//! install stage never leaves it half-written.
//!
//! # Core Modules
//!
//! - [`upgrade`] - The update pipeline and each of its stages
//! - [`core`] - Error type and user-facing error formatting
//! - [`config`] - Global configuration (`~/.amgctl/config.toml`)
//! - [`cli`] - Command-line interface
//! - [`utils`] - Progress bars
//! - [`constants`] - Timeouts, file names, and release-feed defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use amgctl_cli::upgrade::{SelfUpdater, UpdateOutcome};
//!
//! # async fn example() -> Result<(), amgctl_cli::core::AmgctlError> {
//! let mut updater = SelfUpdater::new().include_prerelease(false);
//! if let UpdateOutcome::Updated { to, .. } = updater.run().await? {
//!     println!("Now running {to}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod upgrade;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
