//! Phase 4: Command Broadcast
//!
//! Runs a callback at the working path and, following manifests, at every
//! declared path below it. Before the callback runs at a declared path the
//! declared branch is checked out there.
//!
//! The walk is pre-order and follows manifest lines in file order. There is no
//! identity deduplication: a repository reachable through two manifest lines
//! is visited twice. A directory whose physical location is already on the
//! current recursion chain still gets its checkout and callback but is not
//! walked again, so a manifest cycle terminates.

use std::path::{Path, PathBuf};

use super::physical;
use crate::error::{Error, Result};
use crate::events::{Event, EventSink};
use crate::filesystem::FileSystem;
use crate::manifest::read_manifest;
use crate::repository::GitOperations;

/// Walk `start` and every path reachable through manifests, invoking
/// `callback` once per visit.
///
/// Returns the number of callback invocations.
pub fn broadcast<F>(
    fs: &dyn FileSystem,
    git: &dyn GitOperations,
    events: &dyn EventSink,
    start: &Path,
    mut callback: F,
) -> Result<usize>
where
    F: FnMut(&Path) -> Result<()>,
{
    let mut walker = Walker {
        fs,
        git,
        events,
        chain: Vec::new(),
        visits: 0,
    };
    walker.visit(start, &mut callback)?;
    Ok(walker.visits)
}

struct Walker<'a> {
    fs: &'a dyn FileSystem,
    git: &'a dyn GitOperations,
    events: &'a dyn EventSink,
    /// Physical locations of the directories currently being walked
    chain: Vec<PathBuf>,
    visits: usize,
}

impl Walker<'_> {
    fn visit<F>(&mut self, directory: &Path, callback: &mut F) -> Result<()>
    where
        F: FnMut(&Path) -> Result<()>,
    {
        callback(directory)?;
        self.visits += 1;

        let Some(manifest) = read_manifest(self.fs, directory)? else {
            return Ok(());
        };
        self.events.emit(Event::ProcessManifest {
            file: manifest.file.clone(),
        });

        self.chain.push(physical(self.fs, directory));
        for entry in &manifest.entries {
            let path = entry.record.path();

            // Validate git link path
            if !self.fs.is_populated(path) {
                self.chain.pop();
                return Err(Error::InvalidLink {
                    file: manifest.file.clone(),
                    line: entry.line,
                    name: entry.record.name().to_string(),
                    path: path.to_path_buf(),
                });
            }

            self.events.emit(Event::CheckoutStarted {
                branch: entry.record.branch().to_string(),
                path: path.to_path_buf(),
            });
            let checkout = self.git.checkout(path, entry.record.branch());
            if let Err(err) = checkout {
                self.chain.pop();
                return Err(err);
            }

            let outcome = if self.chain.contains(&physical(self.fs, path)) {
                self.events.emit(Event::CycleSkipped {
                    path: path.to_path_buf(),
                });
                callback(path).map(|()| self.visits += 1)
            } else {
                self.visit(path, callback)
            };
            if let Err(err) = outcome {
                self.chain.pop();
                return Err(err);
            }
        }
        self.chain.pop();

        Ok(())
    }
}
