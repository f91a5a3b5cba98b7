//! CLI module - Command-line interface for `SeriLovers`
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// `SeriLovers` watching-state engine
/// Tracks how far each user is through each series
#[derive(Parser)]
#[command(name = "serilovers")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read the configuration from this file instead of searching for one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Show a user's watching status for a series, computing it if needed
    #[command(alias = "s")]
    Status {
        /// User ID
        user_id: i32,
        /// Series ID
        series_id: i32,
    },

    /// Recompute and store a user's watching status for a series
    #[command(alias = "u")]
    Update {
        /// User ID
        user_id: i32,
        /// Series ID
        series_id: i32,
    },

    /// Recompute the state of every user/series pair with progress history
    Backfill,

    /// Write a default config.toml
    Init,
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) if path.exists() => Config::load_from_path(path),
            Some(_) if matches!(self.command, Some(Commands::Init)) => Ok(Config::default()),
            Some(path) => anyhow::bail!("Config file not found: {}", path.display()),
            None => Config::load(),
        }
    }
}
