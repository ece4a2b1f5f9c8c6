//! `mulescope config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::{ConfigSource, load_config};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Sections accepted by `config show --section`.
const SECTIONS: &[&str] = &["general", "server", "scanner", "analyzer", "metrics"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    source: &ConfigSource,
    projects_dir: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(source, projects_dir, writer).await,
        ConfigAction::Show { section } => {
            execute_show(source, projects_dir, section, writer).await
        }
    }
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if the file is missing, unparsable or holds invalid values.
async fn execute_validate(
    source: &ConfigSource,
    projects_dir: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(source = %source.label(), "validating configuration");

    let report = match load_config(source, projects_dir).await {
        Ok(_) => ConfigValidationReport {
            source: source.label(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: source.label(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Config` if loading fails or `CliError::Command` if section name is invalid.
async fn execute_show(
    source: &ConfigSource,
    projects_dir: Option<&Path>,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(source = %source.label(), "loading configuration");

    let config = load_config(source, projects_dir).await?;

    let config_toml = match section.as_deref() {
        None => to_toml(&config),
        Some("general") => to_toml(&config.general),
        Some("server") => to_toml(&config.server),
        Some("scanner") => to_toml(&config.scanner),
        Some("analyzer") => to_toml(&config.analyzer),
        Some("metrics") => to_toml(&config.metrics),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    };

    let report = ConfigReport {
        source: source.label(),
        section,
        config_toml,
    };
    writer.render(&report)?;

    Ok(())
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {})", e))
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::cli::OutputFormat;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> ConfigSource {
        let path = dir.path().join("mulescope.toml");
        std::fs::write(&path, content).unwrap();
        ConfigSource::File(path)
    }

    #[test]
    fn test_config_report_render_text_section() {
        let report = ConfigReport {
            source: "mulescope.toml".to_owned(),
            section: Some("scanner".to_owned()),
            config_toml: "projects_dir = \"/srv/mule\"\n".to_owned(),
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("[scanner]"));
        assert!(output.contains("projects_dir = \"/srv/mule\""));
    }

    #[test]
    fn test_config_report_json_skips_toml() {
        let report = ConfigReport {
            source: "mulescope.toml".to_owned(),
            section: None,
            config_toml: "[general]".to_owned(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], "mulescope.toml");
        assert!(json.get("config_toml").is_none());
        assert!(json.get("section").is_none());
    }

    #[test]
    fn test_validation_report_render_invalid() {
        let report = ConfigValidationReport {
            source: "mulescope.toml".to_owned(),
            valid: false,
            errors: vec!["port must be non-zero".to_owned()],
        };

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("INVALID"));
        assert!(output.contains("port must be non-zero"));
    }

    #[tokio::test]
    async fn test_validate_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_config(&dir, "[server]\nport = 9000\n");
        let writer = OutputWriter::new(OutputFormat::Json);

        execute_validate(&source, None, &writer)
            .await
            .expect("valid configuration");
    }

    #[tokio::test]
    async fn test_validate_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_config(&dir, "[general]\nlog_level = \"loud\"\n");
        let writer = OutputWriter::new(OutputFormat::Json);

        let err = execute_validate(&source, None, &writer).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let source = ConfigSource::File(PathBuf::from("/nonexistent/mulescope.toml"));
        let writer = OutputWriter::new(OutputFormat::Json);
        let err = execute_validate(&source, None, &writer).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_show_unknown_section() {
        let writer = OutputWriter::new(OutputFormat::Json);
        let err = execute_show(
            &ConfigSource::Defaults,
            None,
            Some("database".to_owned()),
            &writer,
        )
        .await
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("scanner"));
    }

    #[tokio::test]
    async fn test_show_every_known_section() {
        let writer = OutputWriter::new(OutputFormat::Json);
        for section in SECTIONS {
            execute_show(
                &ConfigSource::Defaults,
                None,
                Some((*section).to_owned()),
                &writer,
            )
            .await
            .unwrap_or_else(|e| panic!("section {section} should render: {e}"));
        }
    }

    #[test]
    fn test_to_toml_section() {
        let config = mulescope_core::config::MulescopeConfig::default();
        let rendered = to_toml(&config.scanner);
        assert!(rendered.contains("projects_dir"));
        assert!(rendered.contains("flow_locations"));
    }
}
