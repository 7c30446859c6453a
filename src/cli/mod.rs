//! Command-line interface for amgctl.
//!
//! Parses arguments with `clap`, turns the global flags into a [`CliConfig`],
//! and dispatches to the subcommand handler.
//!
//! # Global Options
//!
//! - `-v, --verbose`: Debug logging
//! - `-q, --quiet`: Errors only; no status lines
//! - `-c, --config <PATH>`: Use this config file instead of the default
//! - `--no-progress`: Hide progress bars
//!
//! # Examples
//!
//! ```bash
//! amgctl update
//! amgctl update --check
//! amgctl --config ./amgctl.toml update --prerelease
//! ```

pub mod update;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags, passed explicitly to commands.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter to install; `None` means honour `RUST_LOG` with a `warn` default.
    pub log_level: Option<String>,

    /// Whether progress bars are suppressed.
    pub no_progress: bool,

    /// Whether status lines are suppressed.
    pub quiet: bool,

    /// Config file chosen with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with every flag off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// Logs go to stderr so they never mix with command output.
    pub fn init_logging(&self) {
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// amgctl command-line arguments.
#[derive(Parser)]
#[command(
    name = "amgctl",
    about = "AMG control CLI",
    version,
    long_about = "amgctl manages AMG environments. The update command replaces this binary with the latest published release."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress everything except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to an alternate config file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Update amgctl to the latest version
    Update(update::UpdateArgs),
}

impl Cli {
    /// Execute the parsed command with configuration built from the flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Build the [`CliConfig`] for the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Execute the parsed command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Update(args) => update::execute(args, &config).await,
        }
    }
}
