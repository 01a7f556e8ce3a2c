use color_eyre::Result;
use giftree::cli::{needs_config, parse_args, run_cli_command};
use giftree::config::AppConfig;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("giftree=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let command = parse_args(std::env::args());
    let config = if needs_config(&command) {
        AppConfig::from_env()?
    } else {
        AppConfig::default()
    };

    run_cli_command(command, &config).await
}
