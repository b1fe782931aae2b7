//! # Update Command Implementation
//!
//! This module implements the `update` subcommand: clone every missing
//! repository, then link. Running it again right away clones nothing and
//! changes no link.

use anyhow::{Context, Result};

use gil::output::emoji;
use gil::phases::orchestrator;

use super::workspace;
use crate::cli::GlobalOptions;

/// Execute the `update` command.
pub fn execute(globals: &GlobalOptions) -> Result<()> {
    let mut workspace = workspace(globals);
    let report = orchestrator::execute_update(&mut workspace, &[]).with_context(|| {
        format!(
            "Failed to update git links in {}",
            globals.directory.display()
        )
    })?;

    println!(
        "{} Cloned {} repositories; {}",
        emoji(&globals.output, "✅", "[OK]"),
        report.clone.cloned.len(),
        super::link::summary(&report.link)
    );
    Ok(())
}
