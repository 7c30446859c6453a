//! amgctl CLI entry point
//!
//! Parses arguments, runs the selected command, and prints failures with
//! context and suggestions before exiting non-zero.

use amgctl_cli::cli;
use amgctl_cli::core::user_friendly_error;
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
