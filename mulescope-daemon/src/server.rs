//! Daemon assembly and lifecycle.
//!
//! [`Daemon`] validates the configuration, installs the metrics recorder when
//! enabled, builds the project scanner and serves the REST router until a
//! shutdown signal arrives.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::Result;
use tokio::net::TcpListener;

use mulescope_core::config::MulescopeConfig;
use mulescope_project_scanner::ProjectScanner;

use crate::api::{AppState, router};
use crate::metrics_server;

/// Configuration file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "mulescope.toml";

/// Load the configuration from an explicit path, the working directory, or defaults.
///
/// Environment overrides apply in every case.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or fails validation.
pub async fn load_config(path: Option<&Path>) -> Result<MulescopeConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None if Path::new(DEFAULT_CONFIG_PATH).is_file() => Some(DEFAULT_CONFIG_PATH.into()),
        None => None,
    };

    let config = match path {
        Some(path) => MulescopeConfig::load(&path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", path.display(), e))?,
        None => {
            let mut config = MulescopeConfig::default();
            config.apply_env_overrides();
            config
        }
    };

    Ok(config)
}

/// The REST daemon.
pub struct Daemon {
    config: MulescopeConfig,
    state: AppState,
}

impl Daemon {
    /// Build from an already-loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the metrics recorder cannot be
    /// installed, or the scanner cannot be built.
    pub fn build_from_config(config: MulescopeConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let scanner = ProjectScanner::from_core_config(&config)
            .map_err(|e| anyhow::anyhow!("failed to build project scanner: {}", e))?;

        tracing::info!(
            projects_dir = %config.scanner.projects_dir,
            flow_locations = config.scanner.flow_locations.len(),
            "project scanner initialized"
        );

        Ok(Self {
            state: AppState::new(scanner),
            config,
        })
    }

    /// Address the REST server binds to.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.host:server.port` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid server address: {}", e))
    }

    /// Bind the configured address and serve until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<()> {
        let addr = self.bind_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;

        self.serve(listener, async {
            match wait_for_shutdown_signal().await {
                Ok(signal) => tracing::info!(signal = signal, "shutdown signal received"),
                Err(e) => tracing::error!(error = %e, "signal handler failed, shutting down"),
            }
        })
        .await
    }

    /// Serve on an existing listener until `shutdown` completes.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!(listen_addr = %local_addr, "mulescope-daemon listening");

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

        tracing::info!("mulescope-daemon shut down");
        Ok(())
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &MulescopeConfig {
        &self.config
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        result = tokio::signal::ctrl_c() => {
            result.map_err(|e| anyhow::anyhow!("failed to listen for Ctrl-C: {}", e))?;
            "SIGINT"
        }
    })
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("failed to listen for Ctrl-C: {}", e))?;
    Ok("Ctrl-C")
}
