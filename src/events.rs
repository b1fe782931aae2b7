//! # Progress Events
//!
//! The traversal phases never print. They describe what they are doing as
//! [`Event`] values handed to an [`EventSink`], and the sink decides where the
//! description goes.
//!
//! - [`LogSink`] forwards to the `log` facade (the CLI installs this one, with
//!   `env_logger` as the backend).
//! - [`RecordingSink`] keeps every event in memory so tests can assert on the
//!   exact sequence of side effects.
//! - [`NullSink`] discards everything.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, info};

/// Something the engine did or is about to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Discovery is starting from this directory.
    WorkingPath { path: PathBuf },
    /// A manifest is being read for discovery.
    DiscoverManifest { file: PathBuf },
    /// A repository is about to be cloned.
    CloneStarted {
        repo: String,
        branch: String,
        path: PathBuf,
    },
    /// A manifest is being reconciled against the record set.
    UpdateLinks { file: PathBuf },
    /// A new symlink was created.
    LinkCreated { target: PathBuf, link: PathBuf },
    /// A symlink pointing at the wrong target was replaced.
    LinkRepaired {
        target: PathBuf,
        link: PathBuf,
        previous: PathBuf,
    },
    /// A real directory sits where a link was requested and was left alone.
    LinkOccupied { target: PathBuf, link: PathBuf },
    /// A manifest is being walked for command broadcast.
    ProcessManifest { file: PathBuf },
    /// A branch is about to be checked out.
    CheckoutStarted { branch: String, path: PathBuf },
    /// A broadcast git subcommand is about to run.
    CommandStarted { command: String, path: PathBuf },
    /// A directory already on the current traversal chain was not re-entered.
    CycleSkipped { path: PathBuf },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::WorkingPath { path } => write!(f, "Working path: {}", path.display()),
            Event::DiscoverManifest { file } => {
                write!(f, "Discover git links: {}", file.display())
            }
            Event::CloneStarted { repo, branch, path } => write!(
                f,
                "Running git clone {} branch \"{}\" into {}",
                repo,
                branch,
                path.display()
            ),
            Event::UpdateLinks { file } => write!(f, "Updating git links: {}", file.display()),
            Event::LinkCreated { target, link } => {
                write!(f, "Update git link: {} -> {}", target.display(), link.display())
            }
            Event::LinkRepaired {
                target,
                link,
                previous,
            } => write!(
                f,
                "Update git link: {} -> {} (was {})",
                target.display(),
                link.display(),
                previous.display()
            ),
            Event::LinkOccupied { target, link } => write!(
                f,
                "Keep existing directory {} instead of linking {}",
                link.display(),
                target.display()
            ),
            Event::ProcessManifest { file } => {
                write!(f, "Processing git links: {}", file.display())
            }
            Event::CheckoutStarted { branch, path } => write!(
                f,
                "Running: git checkout branch \"{}\" in {}",
                branch,
                path.display()
            ),
            Event::CommandStarted { command, path } => {
                write!(f, "Running: git {} in {}", command, path.display())
            }
            Event::CycleSkipped { path } => write!(
                f,
                "Not descending into {} again (already on the current path)",
                path.display()
            ),
        }
    }
}

/// Receives engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Forwards events to the `log` facade.
///
/// Side effects (clones, link changes, checkouts, commands) log at `info`;
/// manifest reads and no-op decisions log at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) {
        match event {
            Event::DiscoverManifest { .. }
            | Event::UpdateLinks { .. }
            | Event::ProcessManifest { .. }
            | Event::CycleSkipped { .. } => debug!("{}", event),
            _ => info!("{}", event),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Keeps events in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Forget everything emitted so far
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
