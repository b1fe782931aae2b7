//! # Context Command Implementation
//!
//! This module implements the `context` subcommand, which prints the resolved
//! record set for the working path: one line per repository identity, at its
//! canonical path, in discovery order.
//!
//! This command is read-only. It neither clones nor links anything.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use gil::manifest::Record;
use gil::output::OutputConfig;

use super::discovered_workspace;
use crate::cli::GlobalOptions;

/// Output format for the context listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ContextFormat {
    /// One `name path repo branch` line per record
    #[default]
    Text,
    /// A JSON document with the working path and the records
    Json,
}

/// Show the resolved git links context
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ContextFormat,
}

#[derive(Serialize)]
struct ContextDocument<'a> {
    root: &'a Path,
    records: Vec<&'a Record>,
}

/// Execute the `context` command.
pub fn execute(args: ContextArgs, globals: &GlobalOptions) -> Result<()> {
    let workspace = discovered_workspace(globals)?;
    let records: Vec<&Record> = workspace.records().iter().collect();

    match args.format {
        ContextFormat::Text => println!("{}", render_text(&globals.output, &records)),
        ContextFormat::Json => {
            let document = ContextDocument {
                root: workspace.root(),
                records,
            };
            let json = serde_json::to_string_pretty(&document)
                .context("Failed to serialize git links context")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Render records as the text listing.
pub fn render_text(output: &OutputConfig, records: &[&Record]) -> String {
    let mut lines = vec!["Gil context:".to_string()];
    lines.extend(records.iter().map(|record| {
        format!(
            "  {} {} {} {}",
            output.name(record.name()),
            record.path().display(),
            output.detail(record.repo()),
            output.detail(record.branch())
        )
    }));
    lines.join("\n")
}
