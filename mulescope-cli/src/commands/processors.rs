//! `mulescope processors` command handler

use std::collections::BTreeMap;
use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use mulescope_core::config::MulescopeConfig;
use mulescope_flow_analyzer::{ExclusionRule, FlowAnalyzerConfig, ProcessorRegistry};

use crate::cli::ProcessorsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `processors` command.
///
/// Lists the effective processor table: the built-in entries merged with
/// `analyzer.processor_table` when configured.
pub async fn execute(
    args: ProcessorsArgs,
    config: &MulescopeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let analyzer_config = FlowAnalyzerConfig::from_core(&config.analyzer);
    let registry = tokio::task::spawn_blocking(move || analyzer_config.load_registry())
        .await
        .map_err(|e| CliError::Command(format!("registry loading task failed: {e}")))??;

    let report = build_report(&registry, args.category.as_deref())?;
    writer.render(&report)?;

    Ok(())
}

fn build_report(
    registry: &ProcessorRegistry,
    category: Option<&str>,
) -> Result<ProcessorListReport, CliError> {
    let mut categories: BTreeMap<String, Vec<ProcessorEntry>> = BTreeMap::new();
    for descriptor in registry.descriptors() {
        categories
            .entry(descriptor.category.clone())
            .or_default()
            .push(ProcessorEntry {
                identifier: descriptor.identifier.clone(),
                display_name: descriptor.display_name.clone(),
            });
    }

    if let Some(wanted) = category {
        categories.retain(|name, _| name.eq_ignore_ascii_case(wanted));
        if categories.is_empty() {
            let known: Vec<_> = registry.by_category().into_keys().collect();
            return Err(CliError::Command(format!(
                "unknown category: {} (expected one of: {})",
                wanted,
                known.join(", ")
            )));
        }
    }

    Ok(ProcessorListReport {
        total: categories.values().map(Vec::len).sum(),
        categories,
        exclusions: registry.exclusions().to_vec(),
    })
}

/// Processor table report.
#[derive(Serialize)]
pub struct ProcessorListReport {
    /// Number of processors listed
    pub total: usize,
    /// Processors grouped by category
    pub categories: BTreeMap<String, Vec<ProcessorEntry>>,
    /// Contextual exclusion rules
    pub exclusions: Vec<ExclusionRule>,
}

#[derive(Serialize)]
pub struct ProcessorEntry {
    pub identifier: String,
    pub display_name: String,
}

impl Render for ProcessorListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Processors: {}", self.total.to_string().bold())?;

        for (category, entries) in &self.categories {
            writeln!(w)?;
            writeln!(w, "{} ({})", category.bold().cyan(), entries.len())?;
            for entry in entries {
                writeln!(w, "  {:<36} {}", entry.identifier, entry.display_name)?;
            }
        }

        if !self.exclusions.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "Exclusions".bold())?;
            for rule in &self.exclusions {
                writeln!(w, "  {} inside {}", rule.tag, rule.parent)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_report_lists_builtin_table() {
        let registry = ProcessorRegistry::builtin();
        let report = build_report(&registry, None).unwrap();

        assert_eq!(report.total, registry.len());
        assert!(report.categories.contains_key("Flow Control"));
        assert_eq!(report.exclusions[0].tag, "http:response");
    }

    #[test]
    fn test_build_report_category_filter_is_case_insensitive() {
        let registry = ProcessorRegistry::builtin();
        let report = build_report(&registry, Some("flow control")).unwrap();

        assert_eq!(report.categories.len(), 1);
        let entries = &report.categories["Flow Control"];
        assert!(entries.iter().any(|e| e.identifier == "flow-ref"));
        assert_eq!(report.total, entries.len());
    }

    #[test]
    fn test_build_report_unknown_category() {
        let registry = ProcessorRegistry::builtin();
        let err = build_report(&registry, Some("Telepathy"))
            .err()
            .expect("unknown category should fail");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Flow Control"));
    }

    #[test]
    fn test_build_report_includes_custom_processors() {
        let registry =
            ProcessorRegistry::builtin().with_processor("acme:audit", "Audit", "Custom");
        let report = build_report(&registry, Some("custom")).unwrap();
        assert_eq!(report.categories["Custom"][0].display_name, "Audit");
    }

    #[test]
    fn test_render_text() {
        let registry = ProcessorRegistry::builtin();
        let report = build_report(&registry, Some("Utility")).unwrap();

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("logger"));
        assert!(output.contains("http:response inside http:listener"));
    }
}
