//! CLI module for GifTree.
//!
//! # Usage
//!
//! ```ignore
//! use giftree::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, &config).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::config::AppConfig;

/// Whether `command` needs the environment configuration.
pub fn needs_config(command: &CliCommand) -> bool {
    matches!(
        command,
        CliCommand::Cat
            | CliCommand::Trees(_)
            | CliCommand::Login(_)
            | CliCommand::Logout
            | CliCommand::Status
            | CliCommand::Click
    )
}

/// Run a parsed command.
pub async fn run_cli_command(command: CliCommand, config: &AppConfig) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(reason) => Err(eyre!("{}\n\n{}", reason, USAGE)),
        CliCommand::Cat => commands::cat(config).await,
        CliCommand::Trees(count) => commands::trees(config, count).await,
        CliCommand::Theme(mode) => commands::theme(mode).await,
        CliCommand::Reminders(enabled) => commands::reminders(enabled).await,
        CliCommand::RunReminders => commands::run_reminders().await,
        CliCommand::Login(email) => commands::login(config, email).await,
        CliCommand::Logout => commands::logout(config).await,
        CliCommand::Status => commands::status(config).await,
        CliCommand::Click => commands::click(config).await,
    }
}
