// src/cli/handlers.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::discovery;
use crate::exit::DepwardenExit;
use crate::metrics::{FileMetrics, ProjectSummary};
use crate::reporting;
use crate::session::AnalysisSession;

fn open_session(root: &Path) -> Result<(AnalysisSession, PathBuf, Vec<PathBuf>)> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot open project root {}", root.display()))?;
    let config = Config::load_from(&root)?;
    let files = discovery::discover(&root);
    Ok((AnalysisSession::on_disk(config, &root), root, files))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handles the scan command.
///
/// # Errors
/// Returns error if the config is invalid or output fails.
pub fn handle_scan(root: &Path, json: bool) -> Result<DepwardenExit> {
    let (session, root, files) = open_session(root)?;
    let scan = session.analyze_project(&files);

    if json {
        print_json(&scan)?;
    } else {
        reporting::print_scan(&scan, &root);
    }

    if scan.violation_count() > 0 {
        Ok(DepwardenExit::ViolationsFound)
    } else {
        Ok(DepwardenExit::Success)
    }
}

#[derive(Serialize)]
struct MetricsOutput {
    files: Vec<FileMetrics>,
    summary: ProjectSummary,
}

/// Handles the metrics command.
///
/// # Errors
/// Returns error if the config is invalid or output fails.
pub fn handle_metrics(root: &Path, json: bool) -> Result<DepwardenExit> {
    let (session, root, files) = open_session(root)?;
    let _ = session.analyze_metrics(&files);
    let output = MetricsOutput {
        files: session.all_file_metrics(),
        summary: session.get_project_summary(),
    };

    if json {
        print_json(&output)?;
    } else {
        reporting::print_metrics(&output.files, &output.summary, &root);
    }
    Ok(DepwardenExit::Success)
}

/// Handles the cycles command.
///
/// # Errors
/// Returns error if the config is invalid.
pub fn handle_cycles(root: &Path) -> Result<DepwardenExit> {
    let (session, root, files) = open_session(root)?;
    let _ = session.build_graph(&files);
    let cycles = session.get_all_cycles();
    reporting::print_cycles(&cycles, &root);

    if cycles.is_empty() {
        Ok(DepwardenExit::Success)
    } else {
        Ok(DepwardenExit::ViolationsFound)
    }
}
