use anyhow::Result;
use clap::Parser;

use mulescope_daemon::cli::DaemonCli;
use mulescope_daemon::logging;
use mulescope_daemon::server::{self, Daemon};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    let mut config = server::load_config(cli.config.as_deref()).await?;
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mulescope-daemon starting");

    Daemon::build_from_config(config)?.run().await
}
