//! Command-line arguments.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const ENV_CONFIG: &str = "TASKLOG_CONFIG";

/// Copy completed Todoist tasks into a Google Sheet journal
#[derive(Parser, Debug)]
#[command(name = "tasklog", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TASKLOG_CONFIG")]
    pub config: Option<String>,

    /// Environment file loaded before reading configuration
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `run`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill empty journal cells for recent days
    Run(RunArgs),

    /// List the spreadsheet's tabs
    Tabs,

    /// Inspect or edit the configuration file
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for `run`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Number of past days to examine (overrides config)
    #[arg(long)]
    pub days: Option<u32>,

    /// Show what would be written without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Treat this date as today (UTC)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Get a value by dotted key (e.g. `sync.lookback_days`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value; booleans and numbers are detected
        value: String,
    },

    /// Create a config file with default values
    Init {
        /// Where to write it (defaults to the standard location)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=value` for `docker run`
        #[arg(long)]
        docker_env: bool,
    },
}

impl Cli {
    /// The configuration file path: `--config`, else `TASKLOG_CONFIG` as seen
    /// through `lookup`.
    ///
    /// Clap reads the variable before `.env` is loaded, so callers resolve it
    /// again afterwards to pick up a value set only in the file.
    pub fn config_path(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.config
            .clone()
            .or_else(|| lookup(ENV_CONFIG).filter(|path| !path.is_empty()))
    }

    /// The subcommand to run, `run` with defaults when none was given.
    pub fn subcommand(&self) -> Command {
        match &self.command {
            Some(Command::Run(args)) => Command::Run(args.clone()),
            Some(Command::Tabs) => Command::Tabs,
            Some(Command::Config { action }) => Command::Config {
                action: action.clone(),
            },
            None => Command::Run(RunArgs::default()),
        }
    }
}
