//! # Version Command Implementation
//!
//! Prints the package version, same as `gil --version` but without the
//! binary name, so scripts can compare it directly.

use anyhow::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    println!("{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
