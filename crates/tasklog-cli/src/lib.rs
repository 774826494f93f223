//! # tasklog-cli
//!
//! The `tasklog` command: loads configuration, builds the Todoist and
//! Google Sheets clients, and runs the backfill.
//!
//! - [`cli`]: argument definitions
//! - [`config`]: layered configuration (defaults, TOML, `.env`, environment)
//! - [`config_handlers`]: `tasklog config` subcommands
//! - [`commands`]: `run` and `tabs`

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction, RunArgs};
pub use config::{TasklogConfig, load_env_file};
