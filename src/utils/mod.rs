//! Utilities and helpers
//!
//! - [`progress`] - Progress bars for long-running transfers

pub mod progress;

pub use progress::{ProgressBar, ProgressStyle};
