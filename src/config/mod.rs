//! Configuration management for amgctl
//!
//! amgctl reads a single user-wide TOML file (see [`global`]). The only
//! section today is `[upgrade]`, which controls where self-updates come from
//! and how long each network step may take.
//!
//! # Examples
//!
//! ```rust,no_run
//! use amgctl_cli::config::GlobalConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlobalConfig::load().await?;
//! println!("Release feed: {}", config.upgrade.releases_url());
//! # Ok(())
//! # }
//! ```

pub mod global;

pub use global::GlobalConfig;
