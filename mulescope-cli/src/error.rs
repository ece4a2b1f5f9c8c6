//! CLI-specific error types and exit code mapping

use mulescope_core::error::{MulescopeError, ScanError};
use mulescope_flow_analyzer::FlowAnalyzerError;
use mulescope_project_scanner::ProjectScannerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed (bad argument, unknown section, ...).
    #[error("{0}")]
    Command(String),

    /// The requested project does not exist under the projects directory.
    #[error("{0}")]
    ProjectNotFound(String),

    /// Scanning or analysis failed.
    #[error("scan error: {0}")]
    Scan(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                       |
    /// |------|-------------------------------|
    /// | 0    | Success                       |
    /// | 1    | General / command error       |
    /// | 2    | Configuration error           |
    /// | 3    | Project not found             |
    /// | 4    | Scan or analysis failure      |
    /// | 10   | IO error                      |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::ProjectNotFound(_) => 3,
            Self::Scan(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<MulescopeError> for CliError {
    fn from(e: MulescopeError) -> Self {
        match e {
            MulescopeError::Config(inner) => Self::Config(inner.to_string()),
            MulescopeError::Scan(ScanError::ProjectNotFound(name)) => {
                Self::ProjectNotFound(format!("Project {name} not found"))
            }
            MulescopeError::Scan(ScanError::InvalidProjectName(name)) => {
                Self::Command(format!("invalid project name: '{name}'"))
            }
            MulescopeError::Analysis(inner) => Self::Scan(inner.to_string()),
            MulescopeError::Scan(inner) => Self::Scan(inner.to_string()),
            MulescopeError::Io(inner) => Self::Io(inner),
        }
    }
}

impl From<ProjectScannerError> for CliError {
    fn from(e: ProjectScannerError) -> Self {
        match e {
            ProjectScannerError::ProjectNotFound(_) => Self::ProjectNotFound(e.to_string()),
            ProjectScannerError::InvalidProjectName(_) => Self::Command(e.to_string()),
            ProjectScannerError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Scan(other.to_string()),
        }
    }
}

impl From<FlowAnalyzerError> for CliError {
    fn from(e: FlowAnalyzerError) -> Self {
        if e.is_document_error() {
            Self::Scan(e.to_string())
        } else {
            Self::Config(e.to_string())
        }
    }
}
