//! `mulescope flows` command handler

use std::io::Write;

use colored::Colorize;
use tracing::info;

use mulescope_core::config::MulescopeConfig;
use mulescope_flow_analyzer::FlowRecord;
use mulescope_project_scanner::{FlowScanReport, ProjectFlows};

use crate::cli::FlowsArgs;
use crate::commands::build_scanner;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, or_dash};

/// Execute the `flows` command.
///
/// Without `--project` every project under the projects directory is scanned;
/// with it only that project is, and a missing project exits with code 3.
pub async fn execute(
    args: FlowsArgs,
    config: &MulescopeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let scanner = build_scanner(config)?;

    match args.project {
        Some(name) => {
            info!(project = %name, "scanning project flows");
            let project = scanner.project_flows(&name).await?;
            writer.render(&project)?;
        }
        None => {
            info!(projects_dir = %config.scanner.projects_dir, "scanning all project flows");
            let report = scanner.scan_flows().await?;
            writer.render(&report)?;
        }
    }

    Ok(())
}

impl Render for FlowScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "Projects: {}  Flows: {}  Endpoints: {}",
            self.total_projects.to_string().bold(),
            self.total_flows.to_string().bold(),
            self.total_endpoints.to_string().bold()
        )?;

        if self.projects.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "No flows found.".yellow())?;
            return Ok(());
        }

        for project in &self.projects {
            writeln!(w)?;
            project.render_text(w)?;
        }

        Ok(())
    }
}

impl Render for ProjectFlows {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "{} ({} flows, {} endpoints)",
            self.project_name.bold().cyan(),
            self.total_flows,
            self.total_endpoints
        )?;
        writeln!(w, "  {}", self.project_path.dimmed())?;

        for flow in &self.flows {
            render_flow(w, flow)?;
        }

        Ok(())
    }
}

/// Write one flow and its endpoints, error handlers, references and sub-flows.
pub(crate) fn render_flow(w: &mut dyn Write, flow: &FlowRecord) -> std::io::Result<()> {
    writeln!(
        w,
        "  {} [{} processors] {}",
        flow.name.bold(),
        flow.processor_count,
        flow.source_file.dimmed()
    )?;

    for endpoint in &flow.endpoints {
        writeln!(
            w,
            "      {:<8} {:<32} {}",
            or_dash(endpoint.method.as_deref()).green(),
            or_dash(endpoint.path.as_deref()),
            or_dash(endpoint.name.as_deref())
        )?;
    }

    if !flow.processor_identifiers.is_empty() {
        writeln!(w, "      processors: {}", flow.processor_identifiers.join(", "))?;
    }
    if !flow.error_handlers.is_empty() {
        writeln!(w, "      error handlers: {}", flow.error_handlers.join(", "))?;
    }
    if !flow.flow_refs.is_empty() {
        writeln!(w, "      flow refs: {}", flow.flow_refs.join(", "))?;
    }
    for sub_flow in &flow.sub_flows {
        writeln!(
            w,
            "      sub-flow {} [{} processors]",
            sub_flow.name, sub_flow.processor_count
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mulescope_flow_analyzer::{EndpointRecord, SubFlowRecord};

    fn sample_flow() -> FlowRecord {
        FlowRecord {
            name: "get:\\orders:api-config".to_owned(),
            source_file: "/srv/orders/src/main/mule/api.xml".to_owned(),
            endpoints: vec![EndpointRecord {
                name: Some("get-orders".to_owned()),
                path: Some("/orders".to_owned()),
                method: Some("GET".to_owned()),
                doc_id: None,
                config_ref: None,
                raw_config: None,
            }],
            processor_count: 2,
            processor_identifiers: vec!["flow-ref".to_owned(), "logger".to_owned()],
            error_handlers: vec!["api-errors".to_owned()],
            flow_refs: vec!["load-orders".to_owned()],
            sub_flows: vec![SubFlowRecord {
                name: "load-orders".to_owned(),
                processor_count: 1,
                processor_identifiers: vec!["db:select".to_owned()],
            }],
        }
    }

    fn sample_project() -> ProjectFlows {
        ProjectFlows {
            project_name: "orders".to_owned(),
            project_path: "/srv/orders".to_owned(),
            flows: vec![sample_flow()],
            total_flows: 1,
            total_endpoints: 1,
        }
    }

    #[test]
    fn test_render_flow_lists_details() {
        let mut buffer = Vec::new();
        render_flow(&mut buffer, &sample_flow()).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("get:\\orders:api-config"));
        assert!(output.contains("/orders"));
        assert!(output.contains("get-orders"));
        assert!(output.contains("error handlers: api-errors"));
        assert!(output.contains("flow refs: load-orders"));
        assert!(output.contains("sub-flow load-orders"));
    }

    #[test]
    fn test_render_report_totals() {
        let report = FlowScanReport::from_projects(vec![sample_project()]);
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("Projects:"));
        assert!(output.contains("orders"));
        assert!(output.contains("/srv/orders"));
    }

    #[test]
    fn test_render_empty_report() {
        let report = FlowScanReport::from_projects(Vec::new());
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("No flows found."));
    }
}
