//! Command-line argument parsing for the GifTree CLI.

use crate::theme::ThemeMode;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Fetch one cat gif and print its URL
    Cat,
    /// List up to n trees
    Trees(u32),
    /// Show (None) or set the theme
    Theme(Option<ThemeMode>),
    /// Show (None) or set the daily reminder
    Reminders(Option<bool>),
    /// Keep running and deliver the daily reminder
    RunReminders,
    /// Sign in; the password is prompted for
    Login(String),
    Logout,
    /// Show the signed-in user and progress
    Status,
    /// Count one click for the signed-in user
    Click,
    /// Print usage
    Help,
    /// Unusable arguments, with the reason
    Invalid(String),
}

/// Parse command-line arguments (including the program name).
///
/// ```
/// use giftree::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["giftree".to_string(), "trees".to_string(), "3".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Trees(3));
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();
    let Some(first) = args.first() else {
        return CliCommand::Help;
    };
    let second = args.get(1).map(String::as_str);

    match first.as_str() {
        "--version" | "-V" => CliCommand::Version,
        "--help" | "-h" | "help" => CliCommand::Help,
        "cat" => CliCommand::Cat,
        "trees" => match second.map(str::parse::<u32>) {
            Some(Ok(n)) => CliCommand::Trees(n),
            _ => CliCommand::Invalid("trees expects a number, e.g. `giftree trees 3`".to_string()),
        },
        "theme" => match second {
            None => CliCommand::Theme(None),
            Some(value) => match value.parse::<ThemeMode>() {
                Ok(mode) => CliCommand::Theme(Some(mode)),
                Err(e) => CliCommand::Invalid(e.to_string()),
            },
        },
        "reminders" => match second {
            None => CliCommand::Reminders(None),
            Some("on") => CliCommand::Reminders(Some(true)),
            Some("off") => CliCommand::Reminders(Some(false)),
            Some("run") => CliCommand::RunReminders,
            Some(other) => CliCommand::Invalid(format!(
                "reminders expects on, off or run, got `{}`",
                other
            )),
        },
        "login" => match second {
            Some(email) => CliCommand::Login(email.to_string()),
            None => CliCommand::Invalid("login expects an email address".to_string()),
        },
        "logout" => CliCommand::Logout,
        "status" => CliCommand::Status,
        "click" => CliCommand::Click,
        other => CliCommand::Invalid(format!("unknown command `{}`", other)),
    }
}

pub const USAGE: &str = "\
Usage: giftree <command>

Commands:
  cat                      Fetch a cat gif and print its URL
  trees <n>                List n trees
  theme [light|dark|system]
                           Show or set the theme
  reminders [on|off|run]   Show or set the daily reminder, or run it
  login <email>            Sign in (prompts for the password)
  logout                   Sign out
  status                   Show your progress
  click                    Count one click
  -V, --version            Print version";
