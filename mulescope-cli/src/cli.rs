//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Mulescope -- structural inventory of Mule flow projects.
///
/// Use `mulescope <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "mulescope", version, about, long_about = None)]
pub struct Cli {
    /// Path to the mulescope.toml configuration file.
    ///
    /// When omitted, `mulescope.toml` in the working directory is used if it exists,
    /// otherwise built-in defaults apply.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Override the projects directory from the configuration.
    #[arg(short, long, global = true)]
    pub projects_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List flows of every project (or a single project).
    Flows(FlowsArgs),

    /// Summarise endpoints across all projects.
    Endpoints,

    /// List pom.xml coordinates and dependencies of every project.
    Dependencies,

    /// Analyze a single flow XML file.
    Analyze(AnalyzeArgs),

    /// List the processor classification table.
    Processors(ProcessorsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- flows ----

/// List flows found in the projects directory.
#[derive(Args, Debug)]
pub struct FlowsArgs {
    /// Only scan this project (directory name under the projects directory).
    #[arg(long)]
    pub project: Option<String>,
}

// ---- analyze ----

/// Analyze one flow XML file outside of any project layout.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Flow XML file to analyze.
    pub file: PathBuf,
}

// ---- processors ----

/// Show registered processors grouped by category.
#[derive(Args, Debug)]
pub struct ProcessorsArgs {
    /// Only show this category (case-insensitive, e.g. "Flow Control").
    #[arg(long)]
    pub category: Option<String>,
}

// ---- config ----

/// Manage mulescope configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, server, scanner, analyzer, metrics).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_flows_all_projects() {
        let cli = Cli::try_parse_from(["mulescope", "flows"]).expect("parse succeeded");
        match cli.command {
            Commands::Flows(args) => assert!(args.project.is_none()),
            _ => panic!("expected Flows command"),
        }
    }

    #[test]
    fn test_cli_parse_flows_single_project() {
        let cli = Cli::try_parse_from(["mulescope", "flows", "--project", "orders-api"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Flows(args) => assert_eq!(args.project.as_deref(), Some("orders-api")),
            _ => panic!("expected Flows command"),
        }
    }

    #[test]
    fn test_cli_parse_endpoints() {
        let cli = Cli::try_parse_from(["mulescope", "endpoints"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Endpoints));
    }

    #[test]
    fn test_cli_parse_dependencies() {
        let cli = Cli::try_parse_from(["mulescope", "dependencies"]).expect("parse succeeded");
        assert!(matches!(cli.command, Commands::Dependencies));
    }

    #[test]
    fn test_cli_parse_analyze_requires_file() {
        assert!(
            Cli::try_parse_from(["mulescope", "analyze"]).is_err(),
            "analyze without a file should fail"
        );

        let cli = Cli::try_parse_from(["mulescope", "analyze", "flows/orders.xml"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.file, PathBuf::from("flows/orders.xml"));
            }
            _ => panic!("expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_processors_category() {
        let cli = Cli::try_parse_from(["mulescope", "processors", "--category", "HTTP"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Processors(args) => assert_eq!(args.category.as_deref(), Some("HTTP")),
            _ => panic!("expected Processors command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["mulescope", "config", "show", "--section", "scanner"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section.as_deref(), Some("scanner"));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["mulescope", "config", "validate"]).expect("parse succeeded");
        match cli.command {
            Commands::Config(args) => assert!(matches!(args.action, ConfigAction::Validate)),
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mulescope",
            "flows",
            "--output",
            "json",
            "--projects-dir",
            "/srv/mule",
            "-c",
            "/etc/mulescope.toml",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert!(matches!(cli.output, OutputFormat::Json));
        assert_eq!(cli.projects_dir, Some(PathBuf::from("/srv/mule")));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/mulescope.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::try_parse_from(["mulescope", "endpoints"]).expect("parse succeeded");
        assert!(matches!(cli.output, OutputFormat::Text));
        assert!(cli.config.is_none());
        assert!(cli.projects_dir.is_none());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_cli_parse_invalid_output_fails() {
        assert!(Cli::try_parse_from(["mulescope", "--output", "yaml", "flows"]).is_err());
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(
            Cli::try_parse_from(["mulescope"]).is_err(),
            "should fail when no command provided"
        );
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "mulescope");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in [
            "flows",
            "endpoints",
            "dependencies",
            "analyze",
            "processors",
            "config",
        ] {
            assert!(
                subcommands.contains(&expected),
                "should have '{expected}' subcommand"
            );
        }
    }
}
