//! Command handlers -- one module per subcommand

pub mod analyze;
pub mod config;
pub mod dependencies;
pub mod endpoints;
pub mod flows;
pub mod processors;

use std::path::{Path, PathBuf};

use tracing::debug;

use mulescope_core::config::MulescopeConfig;
use mulescope_project_scanner::ProjectScanner;

use crate::error::CliError;

/// Configuration file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "mulescope.toml";

/// Where the effective configuration came from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// A configuration file.
    File(PathBuf),
    /// No file: built-in defaults plus environment overrides.
    Defaults,
}

impl ConfigSource {
    /// Resolve the source from the `--config` flag.
    pub fn resolve(flag: Option<&Path>) -> Self {
        match flag {
            Some(path) => Self::File(path.to_path_buf()),
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::File(PathBuf::from(DEFAULT_CONFIG_PATH))
            }
            None => Self::Defaults,
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Defaults => "(built-in defaults)".to_owned(),
        }
    }
}

/// Load the effective configuration.
///
/// Precedence: CLI flag > environment > file > defaults.
pub async fn load_config(
    source: &ConfigSource,
    projects_dir: Option<&Path>,
) -> Result<MulescopeConfig, CliError> {
    let mut config = match source {
        ConfigSource::File(path) => MulescopeConfig::load(path).await?,
        ConfigSource::Defaults => {
            let mut config = MulescopeConfig::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Some(dir) = projects_dir {
        config.scanner.projects_dir = dir.display().to_string();
    }

    config.validate()?;
    debug!(source = %source.label(), projects_dir = %config.scanner.projects_dir, "configuration loaded");
    Ok(config)
}

/// Build a project scanner from the effective configuration.
pub fn build_scanner(config: &MulescopeConfig) -> Result<ProjectScanner, CliError> {
    Ok(ProjectScanner::from_core_config(config)?)
}
