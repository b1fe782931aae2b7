//! Phase 2: Cloning
//!
//! Makes every resolved record correspond to a populated directory on disk.
//!
//! The frontier starts with every record in the set and is drained smallest
//! name first. A record whose path is missing or empty is cloned; whenever a
//! record's path is populated (freshly cloned or already there), its manifest
//! is read and records with new identities join both the set and the
//! frontier. A failed clone aborts the whole run; nothing is retried and
//! nothing already cloned is rolled back.
//!
//! Running this twice in a row performs no clone the second time but still
//! re-derives the full set.

use std::collections::HashSet;

use super::discovery::expand;
use super::{Frontier, RecordSet};
use crate::error::Result;
use crate::events::{Event, EventSink};
use crate::filesystem::FileSystem;
use crate::manifest::Record;
use crate::repository::GitOperations;

/// What a clone run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    /// Records cloned by this run, in clone order
    pub cloned: Vec<Record>,
    /// Records whose path was already populated
    pub present: usize,
}

/// Clone every missing repository in `records`, expanding the set with the
/// manifests revealed along the way.
pub fn clone_missing(
    fs: &dyn FileSystem,
    git: &dyn GitOperations,
    events: &dyn EventSink,
    records: &mut RecordSet,
    args: &[String],
) -> Result<CloneReport> {
    let mut frontier: Frontier = records.iter().cloned().collect();
    let mut expanded = HashSet::new();
    let mut report = CloneReport::default();

    while let Some(record) = frontier.pop() {
        let path = record.path();

        if fs.is_populated(path) {
            report.present += 1;
        } else {
            events.emit(Event::CloneStarted {
                repo: record.repo().to_string(),
                branch: record.branch().to_string(),
                path: path.to_path_buf(),
            });
            git.clone_repository(path, record.repo(), record.branch(), args)?;
            report.cloned.push(record.clone());
        }

        if fs.is_populated(path) {
            let revealed = expand(fs, events, records, path, &mut expanded)?;
            frontier.extend(revealed);
        }
    }

    Ok(report)
}
