//! Phase 1: Discovery
//!
//! Builds the [`RecordSet`] reachable from a working path.
//!
//! ## Process
//!
//! 1.  **Ancestors (`discover`)**: every ancestor of the working path is
//!     visited outermost first, so a manifest declared anywhere above the
//!     working path is read before the working path's own manifest. Running
//!     the tool from any subdirectory of a project therefore resolves the same
//!     canonical paths as running it from the project root.
//!
//! 2.  **Descent (`descend`)**: records whose paths are already populated on
//!     disk have their own manifests read, smallest name first, until no new
//!     identities appear. Nothing is cloned here; this only lets a re-run see
//!     everything the previous run cloned.
//!
//! Each directory's manifest is read at most once per walk (keyed by its
//! physical location), and a record is inserted only if its identity is new,
//! so cyclic manifest graphs terminate.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{physical, Frontier, RecordSet};
use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::filesystem::FileSystem;
use crate::manifest::{read_manifest, Record};
use crate::path::ancestors_outermost_first;

/// Read the manifests of `start` and all of its ancestors, outermost first.
pub fn discover(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    records: &mut RecordSet,
    start: &Path,
) -> Result<()> {
    let mut visited = HashSet::new();
    discover_ancestors(fs, events, records, start, &mut visited)
}

/// Ancestor discovery followed by descent through populated repositories.
pub fn discover_tree(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    records: &mut RecordSet,
    start: &Path,
) -> Result<()> {
    let mut visited = HashSet::new();
    discover_ancestors(fs, events, records, start, &mut visited)?;
    descend(fs, events, records, &mut visited)
}

fn discover_ancestors(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    records: &mut RecordSet,
    start: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<()> {
    for directory in ancestors_outermost_first(start) {
        expand(fs, events, records, &directory, visited)?;
    }
    Ok(())
}

/// Read manifests of every resolved record that is already on disk.
fn descend(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    records: &mut RecordSet,
    visited: &mut HashSet<PathBuf>,
) -> Result<()> {
    let mut frontier: Frontier = records.iter().cloned().collect();

    while let Some(record) = frontier.pop() {
        if !fs.is_populated(record.path()) {
            continue;
        }
        let revealed = expand(fs, events, records, record.path(), visited)?;
        frontier.extend(revealed);
    }
    Ok(())
}

/// Read the manifest of `directory` (once per walk) and insert its records
/// whose identity is new.
///
/// Returns the newly inserted records in file order.
pub(crate) fn expand(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    records: &mut RecordSet,
    directory: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<Vec<Record>> {
    if !visited.insert(physical(fs, directory)) {
        return Ok(Vec::new());
    }

    let Some(manifest) = read_manifest(fs, directory)? else {
        return Ok(Vec::new());
    };
    events.emit(Event::DiscoverManifest {
        file: manifest.file.clone(),
    });

    let mut inserted = Vec::new();
    for entry in manifest.entries {
        if records.insert(entry.record.clone()) {
            inserted.push(entry.record);
        }
    }
    Ok(inserted)
}
