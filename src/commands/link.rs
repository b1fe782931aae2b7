//! # Link Command Implementation
//!
//! This module implements the `link` subcommand. Every manifest line that
//! declares a repository already cloned elsewhere becomes a directory symlink
//! to that canonical copy. Drifted symlinks are repaired and real directories
//! are left alone. Nothing is cloned.

use anyhow::{Context, Result};

use gil::output::emoji;
use gil::phases::LinkReport;

use super::discovered_workspace;
use crate::cli::GlobalOptions;

/// Execute the `link` command.
pub fn execute(globals: &GlobalOptions) -> Result<()> {
    let workspace = discovered_workspace(globals)?;
    let report = workspace
        .link()
        .context("Failed to link git repositories")?;

    println!(
        "{} {}",
        emoji(&globals.output, "🔗", "[LINK]"),
        summary(&report)
    );
    Ok(())
}

/// One-line summary of a link run
pub fn summary(report: &LinkReport) -> String {
    let mut text = format!(
        "Created {} links, repaired {}, {} up to date",
        report.created, report.repaired, report.up_to_date
    );
    if report.occupied > 0 {
        text.push_str(&format!(
            ", {} kept as real directories",
            report.occupied
        ));
    }
    text
}
