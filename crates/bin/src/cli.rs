//! CLI argument definitions for the Tandem binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tandem shared-lists server
#[derive(Parser, Debug)]
#[command(name = "tandem")]
#[command(about = "Tandem: shared lists, together")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Tandem server
    Serve(ServeArgs),
    /// Check health of a running Tandem server
    Health(HealthArgs),
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "TANDEM_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "TANDEM_HOST")]
    pub host: String,

    /// Data directory for storage files.
    /// Holds tandem.json (lists) and users.json (identity seed)
    #[arg(short = 'D', long, env = "TANDEM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(short, long, default_value = "http://127.0.0.1:3000", env = "TANDEM_URL")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}
