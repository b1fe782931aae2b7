//! Orchestrator for the complete update operation
//!
//! `update` brings a working path fully in sync with its manifests:
//! 1. Discover the record set from the working path
//! 2. Clone every missing repository (expanding the set as manifests appear)
//! 3. Reconcile links against the final set
//!
//! Both phases are idempotent, so running `update` twice in a row performs no
//! clone and no filesystem change the second time.

use super::{CloneReport, LinkReport, Workspace};
use crate::error::Result;

/// What an update run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub clone: CloneReport,
    pub link: LinkReport,
}

/// Discover, clone missing repositories, then reconcile links.
///
/// `args` are passed to every `git clone`.
pub fn execute_update(workspace: &mut Workspace, args: &[String]) -> Result<UpdateReport> {
    workspace.discover()?;
    let clone = workspace.clone_missing(args)?;
    let link = workspace.link()?;
    Ok(UpdateReport { clone, link })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, RecordingSink};
    use crate::filesystem::{FileSystem, MemoryFS};
    use crate::phases::testing::{populate, workspace, GitCall, MockGit};
    use std::path::{Path, PathBuf};

    const ROOT_MANIFEST: &str = "libcore ./vendor/libcore git@host:core.git main\n";
    const SIBLING_MANIFEST: &str = "libcore ../deps/libcore git@host:core.git main\n";

    #[test]
    fn test_libcore_scenario() {
        let fs = MemoryFS::new();
        fs.add_file("/work/.gitlinks", ROOT_MANIFEST).unwrap();
        let git = MockGit::new(fs.clone());
        let sink = RecordingSink::new();

        // First clone creates the checkout
        let mut ws = workspace("/work", &fs, &git, &sink);
        ws.discover().unwrap();
        ws.clone_missing(&[]).unwrap();
        assert_eq!(
            git.calls(),
            vec![GitCall::Clone {
                path: PathBuf::from("/work/vendor/libcore"),
                repo: "git@host:core.git".to_string(),
                branch: "main".to_string(),
                args: vec![],
            }]
        );

        // Second clone finds it populated
        let mut ws = workspace("/work", &fs, &git, &sink);
        ws.discover().unwrap();
        let report = ws.clone_missing(&[]).unwrap();
        assert!(report.cloned.is_empty());
        assert_eq!(git.clone_paths().len(), 1);

        // A sibling declares the same identity elsewhere
        populate(&fs, "/work/sibling");
        fs.add_file("/work/sibling/.gitlinks", SIBLING_MANIFEST).unwrap();
        let mut ws = workspace("/work/sibling", &fs, &git, &sink);
        ws.discover().unwrap();
        let report = ws.link().unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(
            fs.read_link(Path::new("/work/deps/libcore")).unwrap(),
            PathBuf::from("/work/vendor/libcore")
        );
        assert_eq!(git.clone_paths().len(), 1);
    }

    #[test]
    fn test_execute_update_clones_then_links() {
        let fs = MemoryFS::new();
        fs.add_file(
            "/work/.gitlinks",
            "core ./vendor/core git@host:core.git main\napp ./app git@host:app.git main\n",
        )
        .unwrap();
        let git = MockGit::new(fs.clone())
            .with_manifest("git@host:app.git", "core ./deps/core git@host:core.git main\n");
        let sink = RecordingSink::new();

        let mut ws = workspace("/work", &fs, &git, &sink);
        let report = execute_update(&mut ws, &[]).unwrap();

        assert_eq!(
            git.clone_paths(),
            vec![PathBuf::from("/work/app"), PathBuf::from("/work/vendor/core")]
        );
        assert_eq!(report.clone.cloned.len(), 2);
        assert_eq!(report.link.created, 1);
        assert_eq!(
            fs.symlinks(),
            vec![(
                PathBuf::from("/work/app/deps/core"),
                PathBuf::from("/work/vendor/core")
            )]
        );
        let events = sink.events();
        assert_eq!(
            events.first(),
            Some(&Event::WorkingPath {
                path: PathBuf::from("/work")
            })
        );
    }

    #[test]
    fn test_execute_update_is_idempotent() {
        let fs = MemoryFS::new();
        fs.add_file(
            "/work/.gitlinks",
            "core ./vendor/core git@host:core.git main\napp ./app git@host:app.git main\n",
        )
        .unwrap();
        let git = MockGit::new(fs.clone())
            .with_manifest("git@host:app.git", "core ./deps/core git@host:core.git main\n");
        let sink = RecordingSink::new();

        execute_update(&mut workspace("/work", &fs, &git, &sink), &[]).unwrap();
        let entries = fs.len();
        let second = execute_update(&mut workspace("/work", &fs, &git, &sink), &[]).unwrap();

        assert!(second.clone.cloned.is_empty());
        assert_eq!(second.clone.present, 2);
        assert_eq!(second.link.changed(), 0);
        assert_eq!(second.link.up_to_date, 1);
        assert_eq!(git.clone_paths().len(), 2);
        assert_eq!(fs.len(), entries);
    }

    #[test]
    fn test_execute_update_from_subdirectory_matches_root() {
        let fs = MemoryFS::new();
        fs.add_file("/work/.gitlinks", ROOT_MANIFEST).unwrap();
        fs.add_dir("/work/src/nested").unwrap();
        let git = MockGit::new(fs.clone());
        let sink = RecordingSink::new();

        let mut ws = workspace("/work/src/nested", &fs, &git, &sink);
        execute_update(&mut ws, &[]).unwrap();

        assert_eq!(git.clone_paths(), vec![PathBuf::from("/work/vendor/libcore")]);
        assert!(fs.is_populated(Path::new("/work/vendor/libcore")));
    }

    /// `app` and `tool` both depend on `lib`, whose manifest points at a
    /// sibling with a `..` path.
    fn shared_dependency_git(fs: &MemoryFS) -> MockGit {
        MockGit::new(fs.clone())
            .with_manifest("git@host:app.git", "lib ./deps/lib git@host:lib.git main\n")
            .with_manifest("git@host:tool.git", "lib ./deps/lib git@host:lib.git main\n")
            .with_manifest("git@host:lib.git", "util ../util git@host:util.git main\n")
    }

    #[test]
    fn test_execute_update_links_every_path_a_linked_repository_declares() {
        let fs = MemoryFS::new();
        fs.add_file(
            "/work/.gitlinks",
            "app ./app git@host:app.git main\ntool ./tool git@host:tool.git main\n",
        )
        .unwrap();
        let git = shared_dependency_git(&fs);
        let sink = RecordingSink::new();

        let report = execute_update(&mut workspace("/work", &fs, &git, &sink), &[]).unwrap();

        assert_eq!(
            git.clone_paths(),
            vec![
                PathBuf::from("/work/app"),
                PathBuf::from("/work/app/deps/lib"),
                PathBuf::from("/work/tool"),
                PathBuf::from("/work/app/deps/util"),
            ]
        );
        assert_eq!(report.link.created, 2);
        assert_eq!(
            fs.symlinks(),
            vec![
                (PathBuf::from("/work/tool/deps/lib"), PathBuf::from("/work/app/deps/lib")),
                (PathBuf::from("/work/tool/deps/util"), PathBuf::from("/work/app/deps/util")),
            ]
        );
    }

    #[test]
    fn test_broadcast_accepts_tree_left_by_update() {
        let fs = MemoryFS::new();
        fs.add_file(
            "/work/.gitlinks",
            "app ./app git@host:app.git main\ntool ./tool git@host:tool.git main\n",
        )
        .unwrap();
        let git = shared_dependency_git(&fs);
        let sink = RecordingSink::new();
        execute_update(&mut workspace("/work", &fs, &git, &sink), &[]).unwrap();

        let mut ws = workspace("/work", &fs, &git, &sink);
        ws.discover().unwrap();
        let visited = ws.command("pull", &[]).unwrap();

        let pulled: Vec<PathBuf> = git
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::Run { path, .. } => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(
            pulled,
            vec![
                PathBuf::from("/work"),
                PathBuf::from("/work/app"),
                PathBuf::from("/work/app/deps/lib"),
                PathBuf::from("/work/app/deps/util"),
                PathBuf::from("/work/tool"),
                PathBuf::from("/work/tool/deps/lib"),
                PathBuf::from("/work/tool/deps/util"),
            ]
        );
        assert_eq!(visited, 7);
    }
}
