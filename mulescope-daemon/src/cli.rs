//! CLI argument definitions for mulescope-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Mulescope REST daemon.
///
/// Serves flow, endpoint and dependency inventories of the configured
/// projects directory over HTTP.
#[derive(Parser, Debug)]
#[command(name = "mulescope-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to mulescope.toml configuration file.
    ///
    /// When omitted, `mulescope.toml` in the working directory is used if it
    /// exists, otherwise built-in defaults apply.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}
