// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "depwarden",
    version,
    about = "Dependency cycles, layer rules and architecture metrics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Log at debug level (overridden by DEPWARDEN_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the graph, learn the project and report every violation
    Scan {
        /// Emit JSON to stdout
        #[arg(long)]
        json: bool,
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,
    },
    /// Per-file coupling and maintainability, plus a project summary
    Metrics {
        /// Emit JSON to stdout
        #[arg(long)]
        json: bool,
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,
    },
    /// List every dependency cycle
    Cycles {
        #[arg(value_name = "ROOT", default_value = ".")]
        root: PathBuf,
    },
}
