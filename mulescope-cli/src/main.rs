//! Mulescope CLI -- structural inventory of Mule flow projects
//!
//! Reports flows, endpoints and pom.xml dependencies of every project under a
//! projects directory, or analyzes a single flow file.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::ConfigSource;
use crate::error::CliError;
use crate::output::OutputWriter;

/// Log level used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_LOG_LEVEL: &str = "warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_deref())?;

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Initialise tracing to stderr so stdout stays clean for reports.
///
/// Precedence: `--log-level` > `RUST_LOG` > `warn`.
fn init_tracing(log_level: Option<&str>) -> anyhow::Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    let source = ConfigSource::resolve(cli.config.as_deref());
    let projects_dir = cli.projects_dir.as_deref();

    match cli.command {
        Commands::Config(args) => {
            commands::config::execute(args, &source, projects_dir, &writer).await
        }
        Commands::Flows(args) => {
            let config = commands::load_config(&source, projects_dir).await?;
            commands::flows::execute(args, &config, &writer).await
        }
        Commands::Endpoints => {
            let config = commands::load_config(&source, projects_dir).await?;
            commands::endpoints::execute(&config, &writer).await
        }
        Commands::Dependencies => {
            let config = commands::load_config(&source, projects_dir).await?;
            commands::dependencies::execute(&config, &writer).await
        }
        Commands::Analyze(args) => {
            let config = commands::load_config(&source, projects_dir).await?;
            commands::analyze::execute(args, &config, &writer).await
        }
        Commands::Processors(args) => {
            let config = commands::load_config(&source, projects_dir).await?;
            commands::processors::execute(args, &config, &writer).await
        }
    }
}
