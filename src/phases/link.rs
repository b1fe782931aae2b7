//! Phase 3: Link Reconciliation
//!
//! Every manifest line whose identity is already canonical somewhere else must
//! appear on disk as a directory symlink to that canonical path. This phase
//! creates missing links, repairs links that point at the wrong target, and
//! leaves real directories alone.
//!
//! ## Traversal
//!
//! Ancestors of the working path are processed outermost first. After a
//! directory's manifest is reconciled, every destination it validated is
//! processed in turn (depth first, file order), which picks up manifests
//! nested inside linked-in repositories.
//!
//! Manifest paths resolve lexically, so a repository reached through two
//! different paths declares different destinations at each of them. A
//! directory is therefore processed once per lexical path. Descent stops at a
//! directory whose physical location is already on the chain that led to it,
//! which ends a manifest cycle as soon as it comes back around.
//!
//! The record set is only read here; running the phase again performs no
//! filesystem changes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{physical, RecordSet};
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::filesystem::FileSystem;
use crate::manifest::{read_manifest, Entry, Manifest};
use crate::path::ancestors_outermost_first;

/// How a manifest line relates to the record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identity is resolved; this is its canonical path.
    Registered(PathBuf),
    /// The identity is unknown but the path already holds a checkout.
    Unregistered,
    /// The identity is unknown and nothing is on disk.
    Missing,
}

/// What reconciliation did for one manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The line declares the canonical location itself.
    Canonical,
    /// A new symlink was created.
    Created,
    /// A symlink with a different target was replaced.
    Repaired { previous: PathBuf },
    /// A symlink to the canonical path was already there.
    UpToDate,
    /// A real directory occupies the destination and was left alone.
    Occupied,
    /// The identity is unknown but the destination is already populated.
    Unregistered,
}

/// Counts of link outcomes over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub canonical: usize,
    pub created: usize,
    pub repaired: usize,
    pub up_to_date: usize,
    pub occupied: usize,
    pub unregistered: usize,
}

impl LinkReport {
    fn record(&mut self, outcome: &LinkOutcome) {
        match outcome {
            LinkOutcome::Canonical => self.canonical += 1,
            LinkOutcome::Created => self.created += 1,
            LinkOutcome::Repaired { .. } => self.repaired += 1,
            LinkOutcome::UpToDate => self.up_to_date += 1,
            LinkOutcome::Occupied => self.occupied += 1,
            LinkOutcome::Unregistered => self.unregistered += 1,
        }
    }

    /// Number of links created or replaced
    pub fn changed(&self) -> usize {
        self.created + self.repaired
    }
}

/// Reconcile links for `start`, its ancestors and every directory reachable
/// through their manifests.
pub fn link(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    records: &RecordSet,
    start: &Path,
) -> Result<LinkReport> {
    let mut visited = HashSet::new();
    let mut report = LinkReport::default();

    for ancestor in ancestors_outermost_first(start) {
        let mut stack = vec![Pending {
            directory: ancestor,
            chain: Vec::new(),
        }];

        while let Some(Pending { directory, mut chain }) = stack.pop() {
            if !visited.insert(directory.clone()) {
                continue;
            }
            let location = physical(fs, &directory);
            if chain.contains(&location) {
                events.emit(Event::CycleSkipped { path: directory });
                continue;
            }

            let destinations = link_dir(fs, events, records, &directory, &mut report)?;
            chain.push(location);
            stack.extend(destinations.into_iter().rev().map(|destination| Pending {
                directory: destination,
                chain: chain.clone(),
            }));
        }
    }

    Ok(report)
}

/// A directory waiting on the work stack.
struct Pending {
    directory: PathBuf,
    /// Physical locations of the directories that led here
    chain: Vec<PathBuf>,
}

/// Reconcile the manifest of `directory`, returning the validated
/// destinations in file order.
fn link_dir(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    records: &RecordSet,
    directory: &Path,
    report: &mut LinkReport,
) -> Result<Vec<PathBuf>> {
    let Some(manifest) = read_manifest(fs, directory)? else {
        return Ok(Vec::new());
    };
    events.emit(Event::UpdateLinks {
        file: manifest.file.clone(),
    });

    let mut destinations = Vec::new();
    for entry in &manifest.entries {
        let destination = entry.record.path();

        let outcome = match classify(fs, records, entry) {
            Resolution::Registered(canonical) => reconcile(fs, events, &canonical, destination)?,
            Resolution::Unregistered => LinkOutcome::Unregistered,
            Resolution::Missing => return Err(invalid_link(&manifest, entry)),
        };

        // Validate git link path
        if !fs.is_populated(destination) {
            return Err(invalid_link(&manifest, entry));
        }

        report.record(&outcome);
        destinations.push(destination.to_path_buf());
    }

    Ok(destinations)
}

/// Classify a manifest line against the record set.
pub fn classify(fs: &dyn FileSystem, records: &RecordSet, entry: &Entry) -> Resolution {
    match records.canonical(&entry.record) {
        Some(canonical) => Resolution::Registered(canonical.path().to_path_buf()),
        None if fs.is_populated(entry.record.path()) => Resolution::Unregistered,
        None => Resolution::Missing,
    }
}

/// Make `destination` resolve to `canonical`.
pub fn reconcile(
    fs: &dyn FileSystem,
    events: &dyn EventSink,
    canonical: &Path,
    destination: &Path,
) -> Result<LinkOutcome> {
    if canonical == destination {
        return Ok(LinkOutcome::Canonical);
    }

    if !fs.is_populated(destination) {
        create_link(fs, canonical, destination)?;
        events.emit(Event::LinkCreated {
            target: canonical.to_path_buf(),
            link: destination.to_path_buf(),
        });
        return Ok(LinkOutcome::Created);
    }

    if !fs.is_symlink(destination) {
        events.emit(Event::LinkOccupied {
            target: canonical.to_path_buf(),
            link: destination.to_path_buf(),
        });
        return Ok(LinkOutcome::Occupied);
    }

    let previous = fs.read_link(destination)?;
    if previous == canonical {
        return Ok(LinkOutcome::UpToDate);
    }

    create_link(fs, canonical, destination)?;
    events.emit(Event::LinkRepaired {
        target: canonical.to_path_buf(),
        link: destination.to_path_buf(),
        previous: previous.clone(),
    });
    Ok(LinkOutcome::Repaired { previous })
}

/// Replace whatever sits at `destination` with a directory symlink to
/// `canonical`, creating missing parent directories.
fn create_link(fs: &dyn FileSystem, canonical: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        fs.create_dir_all(parent)?;
    }
    // Remove existing file, link or empty folder
    if fs.is_symlink(destination) || fs.exists(destination) {
        fs.remove(destination)?;
    }
    fs.symlink_dir(canonical, destination)
}

fn invalid_link(manifest: &Manifest, entry: &Entry) -> Error {
    Error::InvalidLink {
        file: manifest.file.clone(),
        line: entry.line,
        name: entry.record.name().to_string(),
        path: entry.record.path().to_path_buf(),
    }
}
