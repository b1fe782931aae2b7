//! # Git Links Library
//!
//! This library provides the engine behind the `gil` command-line tool: it
//! keeps a tree of git repositories in sync with the `.gitlinks` manifests
//! found inside it. Every repository is cloned exactly once, at its canonical
//! path, and every other place that asks for it gets a directory symlink to
//! that copy.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use gil::filesystem::MemoryFS;
//! use gil::manifest::read_manifest;
//!
//! // Create an in-memory filesystem
//! let fs = MemoryFS::new();
//! fs.add_file(
//!     "/work/.gitlinks",
//!     "libcore ./vendor/libcore git@host:core.git main\n",
//! )
//! .unwrap();
//!
//! // Paths resolve relative to the manifest's directory
//! let manifest = read_manifest(&fs, Path::new("/work")).unwrap().unwrap();
//! assert_eq!(manifest.len(), 1);
//! assert_eq!(
//!     manifest.entries[0].record.path(),
//!     Path::new("/work/vendor/libcore")
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifests (`manifest`)**: one `name path repo branch` line per linked
//!   repository. Two lines with the same `(name, repo, branch)` identity refer
//!   to the same repository, whatever their paths.
//! - **Record set (`phases::RecordSet`)**: identity to canonical record, where
//!   the first declaration seen wins.
//! - **Filesystem (`filesystem`)**: a narrow trait over the operations the
//!   engine needs, with a host implementation and an in-memory fake.
//! - **Git (`repository`, `git`)**: clone, checkout and arbitrary subcommands
//!   run through the system `git` executable.
//! - **Events (`events`)**: the engine reports progress as events instead of
//!   printing.
//!
//! ## Execution Flow
//!
//! Every command builds a [`phases::Workspace`] for the working path and then:
//!
//! 1.  **Discovery**: read manifests of the working path's ancestors, outermost
//!     first, then of repositories already on disk.
//! 2.  **Cloning**: clone missing repositories, reading each new checkout's
//!     manifest as it appears.
//! 3.  **Linking**: create or repair symlinks for non-canonical declarations.
//! 4.  **Broadcast**: check out declared branches and run a git subcommand in
//!     every declared repository.

pub mod defaults;
pub mod error;
pub mod events;
pub mod filesystem;
pub mod git;
pub mod manifest;
pub mod output;
pub mod path;
pub mod phases;
pub mod repository;

#[cfg(test)]
mod path_proptest;
