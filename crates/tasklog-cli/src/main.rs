//! tasklog
//!
//! Copies completed Todoist tasks into a Google Sheet journal.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tasklog_cli::config_handlers::handle_config_command;
use tasklog_cli::{Cli, Command, TasklogConfig, commands, load_env_file};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // Before logging starts, so RUST_LOG may come from the file.
    let env_loaded = load_env_file(&cli.env_file)?;
    init_tracing(cli.verbose);
    let config_path = cli.config_path(|key| std::env::var(key).ok());

    if env_loaded {
        tracing::debug!(path = %cli.env_file.display(), "Loaded environment file");
    }

    match cli.subcommand() {
        Command::Run(args) => {
            let config = TasklogConfig::load(config_path.as_deref())?;
            let report = commands::run(&config, &args).await.inspect_err(|e| {
                tracing::error!(error = %e, "Sync failed");
            })?;
            println!("{report}");
        }
        Command::Tabs => {
            let config = TasklogConfig::load(config_path.as_deref())?;
            for tab in commands::tabs(&config).await? {
                println!("{tab}");
            }
        }
        Command::Config { action } => handle_config_command(config_path.as_deref(), action)?,
    }

    Ok(())
}

/// Logs go to stderr, unbuffered. `-v` forces debug; otherwise `RUST_LOG`
/// applies, defaulting to info.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
