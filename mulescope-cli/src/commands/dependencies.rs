//! `mulescope dependencies` command handler

use std::io::Write;

use colored::Colorize;
use tracing::info;

use mulescope_core::config::MulescopeConfig;
use mulescope_project_scanner::DependencyScanReport;

use crate::commands::build_scanner;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, or_dash};

/// Execute the `dependencies` command.
pub async fn execute(config: &MulescopeConfig, writer: &OutputWriter) -> Result<(), CliError> {
    let scanner = build_scanner(config)?;
    info!(projects_dir = %config.scanner.projects_dir, "scanning project manifests");

    let report = scanner.scan_dependencies().await?;
    writer.render(&report)?;

    Ok(())
}

impl Render for DependencyScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Projects: {}", self.total_projects.to_string().bold())?;

        if self.projects.is_empty() {
            writeln!(w)?;
            writeln!(w, "{}", "No pom.xml files found.".yellow())?;
            return Ok(());
        }

        for project in &self.projects {
            writeln!(w)?;
            writeln!(
                w,
                "{} {}:{}:{} ({})",
                project.project_name.bold().cyan(),
                project.group_id,
                project.artifact_id,
                project.version,
                project.packaging
            )?;
            writeln!(
                w,
                "  runtime: {}  mule-maven-plugin: {}",
                or_dash(project.app_runtime.as_deref()),
                or_dash(project.mule_maven_plugin_version.as_deref())
            )?;

            if project.dependencies.is_empty() {
                writeln!(w, "  {}", "no dependencies".dimmed())?;
                continue;
            }

            writeln!(
                w,
                "  {:<28} {:<32} {:<12} {:<18} Scope",
                "Group", "Artifact", "Version", "Classifier"
            )?;
            writeln!(w, "  {}", "-".repeat(100))?;
            for dep in &project.dependencies {
                writeln!(
                    w,
                    "  {:<28} {:<32} {:<12} {:<18} {}",
                    dep.group_id,
                    dep.artifact_id,
                    dep.version,
                    or_dash(dep.classifier.as_deref()),
                    or_dash(dep.scope.as_deref())
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mulescope_project_scanner::{DependencyInfo, ProjectInfo};

    fn project(name: &str, dependencies: Vec<DependencyInfo>) -> ProjectInfo {
        ProjectInfo {
            project_name: name.to_owned(),
            project_path: format!("/srv/{name}"),
            group_id: "com.acme".to_owned(),
            artifact_id: name.to_owned(),
            version: "1.0.0".to_owned(),
            packaging: "mule-application".to_owned(),
            app_runtime: Some("4.4.0".to_owned()),
            mule_maven_plugin_version: None,
            dependencies,
        }
    }

    #[test]
    fn test_render_dependency_table() {
        let report = DependencyScanReport::from_projects(vec![project(
            "orders",
            vec![DependencyInfo {
                group_id: "org.mule.connectors".to_owned(),
                artifact_id: "mule-http-connector".to_owned(),
                version: "1.7.3".to_owned(),
                classifier: Some("mule-plugin".to_owned()),
                scope: None,
            }],
        )]);

        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("com.acme:orders:1.0.0"));
        assert!(output.contains("runtime: 4.4.0"));
        assert!(output.contains("mule-maven-plugin: -"));
        assert!(output.contains("mule-http-connector"));
    }

    #[test]
    fn test_render_project_without_dependencies() {
        let report = DependencyScanReport::from_projects(vec![project("docs", Vec::new())]);
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("no dependencies"));
    }

    #[test]
    fn test_render_empty_report() {
        let report = DependencyScanReport::from_projects(Vec::new());
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("No pom.xml files found."));
    }
}
