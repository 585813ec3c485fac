//! Command-line interface for the Allegro device-flow authorizer.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Allegro device-flow authorization CLI.
#[derive(Parser, Debug)]
#[command(
    name = "allegro-auth",
    version,
    about = "OAuth 2.0 device-flow authorization for the Allegro REST API"
)]
pub struct Cli {
    /// Path to the persisted credential file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Obtain (or reuse) an access token via the device flow
    Login,
    /// Show the stored credential state
    Status,
    /// Remove the stored credential
    Logout,
}
