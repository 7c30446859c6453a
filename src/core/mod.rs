//! Core types for amgctl
//!
//! This module holds the error type shared by the whole crate and the helpers
//! that turn errors into operator-facing messages.
//!
//! # Modules
//!
//! - `error` - [`AmgctlError`] and the [`ErrorContext`] wrapper
//! - `error_formatting` - [`user_friendly_error`] and [`create_error_context`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use amgctl_cli::core::{AmgctlError, user_friendly_error};
//!
//! fn example_operation() -> anyhow::Result<()> {
//!     Err(AmgctlError::NoReleaseFound { include_prerelease: false }.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;
pub mod error_formatting;

pub use error::{AmgctlError, ErrorContext};
pub use error_formatting::{create_error_context, user_friendly_error};
