//! Command dispatch logic extracted from binary to reduce main function size.

use super::{
    args::Commands,
    handlers::{handle_cycles, handle_metrics, handle_scan},
};
use crate::exit::DepwardenExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands) -> Result<DepwardenExit> {
    match command {
        Commands::Scan { json, root } => handle_scan(&root, json),
        Commands::Metrics { json, root } => handle_metrics(&root, json),
        Commands::Cycles { root } => handle_cycles(&root),
    }
}
