//! `amgctl update`: replace the running binary with the latest release.
//!
//! # Examples
//!
//! ```bash
//! amgctl update                 # install the latest stable release if newer
//! amgctl update --check         # only report whether an update exists
//! amgctl update --prerelease    # also consider prerelease builds
//! amgctl update --force         # reinstall even when already current
//! ```

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::debug;

use crate::cli::CliConfig;
use crate::config::GlobalConfig;
use crate::upgrade::version_check::format_version_info;
use crate::upgrade::{SelfUpdater, UpdateOutcome};
use crate::utils::progress::is_progress_disabled;

/// Arguments for `amgctl update`.
#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Force update even if the version is the same
    #[arg(short, long)]
    pub force: bool,

    /// Include prerelease versions
    #[arg(long)]
    pub prerelease: bool,

    /// Check for an update without installing it
    #[arg(long, conflicts_with = "force")]
    pub check: bool,
}

impl UpdateArgs {
    fn updater(&self, global: GlobalConfig, cli: &CliConfig) -> SelfUpdater {
        SelfUpdater::new()
            .with_config(global.upgrade)
            .force(self.force)
            .include_prerelease(self.prerelease)
            .quiet(cli.quiet)
            .show_progress(!cli.no_progress && !is_progress_disabled())
    }
}

/// Run the update command.
pub async fn execute(args: UpdateArgs, cli: &CliConfig) -> Result<()> {
    let global = GlobalConfig::load_with_optional(cli.config_path.clone())
        .await
        .context("Failed to load configuration")?;
    debug!("Release feed: {}", global.upgrade.releases_url());

    let mut updater = args.updater(global, cli);

    if args.check {
        let check = updater.check().await?;
        println!("{}", format_version_info(&check.current_version, Some(&check.latest_version)));
        if check.update_available {
            println!("Run `amgctl update` to install the latest version");
        }
        return Ok(());
    }

    match updater.run().await? {
        UpdateOutcome::UpToDate {
            current,
            ..
        } => {
            println!("{}", format!("You are already running the latest version ({current})").green());
        }
        UpdateOutcome::Updated {
            from,
            to,
        } => {
            println!("{}", format!("Successfully updated amgctl from {from} to {to}").green());
            println!("Restart your terminal or run the command again to use the new version.");
        }
    }

    Ok(())
}
