//! `mulescope analyze` command handler

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use mulescope_core::config::MulescopeConfig;
use mulescope_flow_analyzer::{
    DocumentAnalysis, DocumentAnalyzer, FlowAnalyzerConfig, FlowExtractor,
};

use crate::cli::AnalyzeArgs;
use crate::commands::flows::render_flow;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `analyze` command.
///
/// Reads a single flow XML file (bounded by `scanner.max_file_size`) and
/// reports its flows and sub-flows. A malformed file exits with code 4.
pub async fn execute(
    args: AnalyzeArgs,
    config: &MulescopeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let path = args.file;
    let metadata = tokio::fs::metadata(&path).await?;
    if metadata.len() > config.scanner.max_file_size as u64 {
        return Err(CliError::Scan(format!(
            "{}: {} bytes exceeds max_file_size {}",
            path.display(),
            metadata.len(),
            config.scanner.max_file_size
        )));
    }

    let content = tokio::fs::read_to_string(&path).await?;
    let extractor = FlowExtractor::from_config(&FlowAnalyzerConfig::from_core(&config.analyzer))?;

    info!(path = %path.display(), analyzer = extractor.name(), "analyzing flow document");
    let analysis = extractor.analyze(&content, &path.display().to_string())?;

    let report = AnalyzeReport {
        total_flows: analysis.flows.len(),
        total_sub_flows: analysis.sub_flows.len(),
        total_endpoints: analysis.endpoint_count(),
        analysis,
    };
    writer.render(&report)?;

    Ok(())
}

/// Single-document analysis report.
#[derive(Serialize)]
pub struct AnalyzeReport {
    pub total_flows: usize,
    pub total_sub_flows: usize,
    pub total_endpoints: usize,
    #[serde(flatten)]
    pub analysis: DocumentAnalysis,
}

impl Render for AnalyzeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Document: {}", self.analysis.source.bold())?;
        writeln!(
            w,
            "Flows: {}  Sub-flows: {}  Endpoints: {}",
            self.total_flows, self.total_sub_flows, self.total_endpoints
        )?;
        writeln!(w)?;

        if self.analysis.flows.is_empty() {
            writeln!(w, "{}", "No flows found.".yellow())?;
        }
        for flow in &self.analysis.flows {
            render_flow(w, flow)?;
        }

        if !self.analysis.sub_flows.is_empty() {
            writeln!(w)?;
            writeln!(w, "{:<40} {:<12} Processors", "Sub-flow", "Count")?;
            writeln!(w, "{}", "-".repeat(80))?;
            for sub_flow in &self.analysis.sub_flows {
                writeln!(
                    w,
                    "{:<40} {:<12} {}",
                    sub_flow.name,
                    sub_flow.processor_count,
                    sub_flow.processor_identifiers.join(", ")
                )?;
            }
        }

        Ok(())
    }
}
