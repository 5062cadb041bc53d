// src/reporting.rs
//! Console output for the CLI.

use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::graph::Cycle;
use crate::metrics::{FileMetrics, Grade, InstabilityBand, ProjectSummary};
use crate::session::ProjectScan;
use crate::types::{Severity, Violation, ViolationKind};

fn display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

fn format_count(n: usize) -> String {
    if n == 0 {
        n.to_string().green().to_string()
    } else {
        n.to_string().red().to_string()
    }
}

/// Prints violations grouped by kind, then a one-line summary.
pub fn print_scan(scan: &ProjectScan, root: &Path) {
    for issue in &scan.config_issues {
        println!(
            "{} {} ({}): {}",
            "config:".yellow().bold(),
            issue.origin,
            issue.pattern,
            issue.message
        );
    }

    let mut by_kind: BTreeMap<ViolationKind, Vec<&Violation>> = BTreeMap::new();
    for file in &scan.files {
        for v in &file.violations {
            by_kind.entry(v.kind).or_default().push(v);
        }
    }

    for (kind, violations) in &by_kind {
        println!(
            "\n{} {} ({})",
            "▸".yellow(),
            kind.label().yellow().bold(),
            kind.description()
        );
        for v in violations {
            print_violation(v, root);
        }
    }

    let total = scan.violation_count();
    let errors = scan
        .files
        .iter()
        .map(|f| f.count(Severity::Error))
        .sum::<usize>();
    let clean = scan.files.iter().filter(|f| f.is_clean()).count();
    println!(
        "\n{} {} {} ({clean} clean) | {} {} | {} {}",
        "DEPWARDEN".cyan().bold(),
        scan.files.len(),
        pluralize("file", scan.files.len()),
        format_count(total),
        pluralize("violation", total),
        format_count(errors),
        pluralize("error", errors),
    );
    if let Some(build) = &scan.build {
        if build.is_truncated() {
            println!(
                "  {} {} of {} files analyzed (limits reached)",
                "note:".yellow(),
                build.processed,
                build.supplied
            );
        }
    }
    if total == 0 {
        println!("{}", "  ✓ No architectural violations.".green());
    }
}

fn print_violation(v: &Violation, root: &Path) {
    let location = match &v.target {
        Some(target) => format!("{} → {}", display(&v.file, root), display(target, root)),
        None => display(&v.file, root),
    };
    let line = format!("    {location}: {}", v.message);
    match v.severity {
        Severity::Error => println!("{}", line.red()),
        Severity::Warning => println!("{}", line.yellow()),
        Severity::Info => println!("{}", line.dimmed()),
    }
    if let Some(suggestion) = &v.suggestion {
        println!("      {}", suggestion.dimmed());
    }
}

fn grade_label(grade: Grade) -> String {
    let label = grade.label();
    match grade {
        Grade::A | Grade::B => label.green().to_string(),
        Grade::C => label.yellow().to_string(),
        Grade::D | Grade::F => label.red().to_string(),
    }
}

fn band_label(band: InstabilityBand) -> String {
    let label = band.label();
    match band {
        InstabilityBand::Stable | InstabilityBand::Balanced => label.normal().to_string(),
        InstabilityBand::Flexible => label.yellow().to_string(),
        InstabilityBand::Unstable => label.red().to_string(),
    }
}

/// Prints one line per file and the project summary.
pub fn print_metrics(metrics: &[FileMetrics], summary: &ProjectSummary, root: &Path) {
    println!("\n{}", "FILE METRICS".cyan().bold());
    for m in metrics {
        println!(
            "  {} {:>5.1} MI  I={:.2} {}  Ca={} Ce={} ({})",
            grade_label(m.maintainability.grade),
            m.maintainability.index,
            m.instability.value,
            band_label(m.instability.classification),
            m.coupling.afferent,
            m.coupling.efferent,
            m.coupling.quality.label(),
        );
        println!("      {}", display(&m.path, root).dimmed());
        if matches!(m.maintainability.grade, Grade::D | Grade::F) {
            for s in &m.maintainability.suggestions {
                println!("      → {s}");
            }
        }
    }

    let health = format!("{:.1}", summary.health_score);
    let health = if summary.health_score >= 70.0 {
        health.green()
    } else if summary.health_score >= 40.0 {
        health.yellow()
    } else {
        health.red()
    };
    println!(
        "\n{} {} {} | mean MI {:.1} | mean instability {:.2} | health {health}",
        "SUMMARY".cyan().bold(),
        summary.files,
        pluralize("file", summary.files),
        summary.average_maintainability,
        summary.average_instability,
    );
}

pub fn print_cycles(cycles: &[Cycle], root: &Path) {
    if cycles.is_empty() {
        println!("{}", "  ✓ No dependency cycles.".green());
        return;
    }
    println!(
        "\n{} {} {}",
        "CYCLES".red().bold(),
        cycles.len(),
        pluralize("cycle", cycles.len())
    );
    for cycle in cycles {
        let chain: Vec<String> = cycle.path.iter().map(|p| display(p, root)).collect();
        println!("  [{}] {}", cycle.depth, chain.join(" → ").red());
    }
}
