//! Traversal phases of the git links engine.
//!
//! ## Overview
//!
//! Every command starts from a single working path and runs some of these
//! phases in order:
//! 1. Discovery - read ancestor manifests (outermost first), then descend
//!    through repositories that are already on disk
//! 2. Cloning - clone missing repositories, expanding the frontier with the
//!    manifests they reveal
//! 3. Linking - realize every non-canonical manifest reference as a directory
//!    symlink to the canonical copy
//! 4. Broadcast - check out the declared branch and run a git subcommand at
//!    every declared path
//!
//! The phases share exactly one piece of mutable state: the [`RecordSet`],
//! which maps each repository [`Identity`] to the first record seen with it.
//! Discovery and cloning append to it; linking and broadcast only read.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::events::{Event, EventSink, LogSink};
use crate::filesystem::{FileSystem, OsFileSystem};
use crate::manifest::{Identity, Record};
use crate::repository::{DefaultGitOperations, GitOperations};

// Phase modules
pub mod broadcast;
pub mod clone;
pub mod discovery;
pub mod link;
pub mod orchestrator;

pub use clone::CloneReport;
pub use link::{LinkOutcome, LinkReport};

/// The resolved record set: identity -> canonical record.
///
/// Append-only. The first record inserted for an identity stays canonical for
/// the lifetime of the set; later records with the same identity are ignored.
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    index: HashMap<Identity, usize>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` unless its identity is already present.
    ///
    /// Returns `true` when `record` became canonical.
    pub fn insert(&mut self, record: Record) -> bool {
        let identity = record.identity();
        if self.index.contains_key(&identity) {
            return false;
        }
        self.index.insert(identity, self.records.len());
        self.records.push(record);
        true
    }

    /// The canonical record for `identity`
    pub fn get(&self, identity: &Identity) -> Option<&Record> {
        self.index.get(identity).map(|&slot| &self.records[slot])
    }

    /// The canonical record sharing `record`'s identity
    pub fn canonical(&self, record: &Record) -> Option<&Record> {
        self.get(&record.identity())
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.index.contains_key(&record.identity())
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Records awaiting clone or descent, popped in ascending record order.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Reverse<Record>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.heap.push(Reverse(record));
    }

    /// Remove and return the smallest remaining record
    pub fn pop(&mut self) -> Option<Record> {
        self.heap.pop().map(|Reverse(record)| record)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Extend<Record> for Frontier {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.heap.extend(iter.into_iter().map(Reverse));
    }
}

impl FromIterator<Record> for Frontier {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut frontier = Frontier::new();
        frontier.extend(iter);
        frontier
    }
}

/// Physical location of `path` used as a visited-set key.
///
/// Falls back to the lexical path when it cannot be resolved.
pub(crate) fn physical(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    fs.canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// A working path together with its collaborators and resolved records.
///
/// This is the entry point the CLI uses: construct it for the working path,
/// call [`Workspace::discover`], then run the phase the command asks for.
pub struct Workspace {
    root: PathBuf,
    fs: Box<dyn FileSystem>,
    git: Box<dyn GitOperations>,
    events: Box<dyn EventSink>,
    records: RecordSet,
}

impl Workspace {
    /// Create a workspace on the host filesystem that runs `git_program`
    /// and logs events.
    pub fn new(root: PathBuf, git_program: &str) -> Self {
        Self::with_operations(
            root,
            Box::new(OsFileSystem),
            Box::new(DefaultGitOperations::new(git_program)),
            Box::new(LogSink),
        )
    }

    /// Create a workspace with custom collaborators.
    ///
    /// `root` must be absolute; manifest paths are resolved lexically from it.
    pub fn with_operations(
        root: PathBuf,
        fs: Box<dyn FileSystem>,
        git: Box<dyn GitOperations>,
        events: Box<dyn EventSink>,
    ) -> Self {
        Self {
            root: crate::path::normalize(&root),
            fs,
            git,
            events,
            records: RecordSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    /// Build the record set: ancestor manifests of the working path first,
    /// then manifests of repositories already present on disk.
    pub fn discover(&mut self) -> Result<()> {
        self.events.emit(Event::WorkingPath {
            path: self.root.clone(),
        });
        discovery::discover_tree(
            self.fs.as_ref(),
            self.events.as_ref(),
            &mut self.records,
            &self.root,
        )
    }

    /// Clone every missing repository, passing `args` to `git clone`.
    pub fn clone_missing(&mut self, args: &[String]) -> Result<CloneReport> {
        clone::clone_missing(
            self.fs.as_ref(),
            self.git.as_ref(),
            self.events.as_ref(),
            &mut self.records,
            args,
        )
    }

    /// Create or repair the links every manifest asks for.
    pub fn link(&self) -> Result<LinkReport> {
        link::link(
            self.fs.as_ref(),
            self.events.as_ref(),
            &self.records,
            &self.root,
        )
    }

    /// Run `git <subcommand> [args...]` at the working path and every path
    /// reachable through manifests, checking out declared branches first.
    ///
    /// Returns the number of directories the command ran in.
    pub fn command(&self, subcommand: &str, args: &[String]) -> Result<usize> {
        let git = self.git.as_ref();
        let events = self.events.as_ref();

        broadcast::broadcast(self.fs.as_ref(), git, events, &self.root, |path| {
            events.emit(Event::CommandStarted {
                command: subcommand.to_string(),
                path: path.to_path_buf(),
            });
            git.run_command(path, subcommand, args)
        })
    }
}
