//! `mulescope endpoints` command handler

use std::io::Write;

use colored::Colorize;
use tracing::info;

use mulescope_core::config::MulescopeConfig;
use mulescope_project_scanner::EndpointSummary;

use crate::commands::build_scanner;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, or_dash};

/// Execute the `endpoints` command.
pub async fn execute(config: &MulescopeConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let scanner = build_scanner(config)?;
    info!(projects_dir = %config.scanner.projects_dir, "summarising endpoints");

    let summary = scanner.endpoints_summary().await?;
    writer.render(&summary)?;

    Ok(())
}

impl Render for EndpointSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "Total endpoints: {}",
            self.total_endpoints.to_string().bold()
        )?;

        if self.total_endpoints == 0 {
            writeln!(w)?;
            writeln!(w, "{}", "No endpoints found.".yellow())?;
            return Ok(());
        }

        let types: Vec<_> = self
            .endpoint_types
            .iter()
            .map(|(kind, count)| format!("{kind}:{count}"))
            .collect();
        writeln!(w, "By type: {}", types.join("  "))?;

        let methods: Vec<_> = self
            .http_methods
            .iter()
            .map(|(method, count)| format!("{method}:{count}"))
            .collect();
        if methods.is_empty() {
            writeln!(w, "By method: -")?;
        } else {
            writeln!(w, "By method: {}", methods.join("  "))?;
        }

        writeln!(w)?;
        writeln!(
            w,
            "{:<24} {:<8} {:<32} Name",
            "Project", "Method", "Path"
        )?;
        writeln!(w, "{}", "-".repeat(80))?;

        for (project, endpoints) in &self.endpoints_by_project {
            for endpoint in &endpoints.endpoints {
                writeln!(
                    w,
                    "{:<24} {:<8} {:<32} {}",
                    project,
                    or_dash(endpoint.method.as_deref()),
                    or_dash(endpoint.path.as_deref()),
                    or_dash(endpoint.name.as_deref())
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mulescope_flow_analyzer::EndpointRecord;
    use mulescope_project_scanner::ProjectEndpoints;

    fn endpoint(method: Option<&str>, path: Option<&str>, name: &str) -> EndpointRecord {
        EndpointRecord {
            name: Some(name.to_owned()),
            path: path.map(str::to_owned),
            method: method.map(str::to_owned),
            doc_id: None,
            config_ref: None,
            raw_config: None,
        }
    }

    #[test]
    fn test_render_summary_table() {
        let mut summary = EndpointSummary {
            total_endpoints: 2,
            ..Default::default()
        };
        summary.endpoint_types.insert("HTTP".to_owned(), 1);
        summary.endpoint_types.insert("Other".to_owned(), 1);
        summary.http_methods.insert("GET".to_owned(), 1);
        summary.endpoints_by_project.insert(
            "orders".to_owned(),
            ProjectEndpoints {
                count: 2,
                endpoints: vec![
                    endpoint(Some("GET"), Some("/orders"), "get-orders"),
                    endpoint(None, None, "billing-events"),
                ],
            },
        );

        let mut buffer = Vec::new();
        summary.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("HTTP:1"));
        assert!(output.contains("Other:1"));
        assert!(output.contains("GET:1"));
        assert!(output.contains("/orders"));
        assert!(output.contains("billing-events"));
    }

    #[test]
    fn test_render_empty_summary() {
        let summary = EndpointSummary::default();
        let mut buffer = Vec::new();
        summary.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("No endpoints found."));
    }
}
