//! Reconcile Service - syncs a directory to a declared tree.
//!
//! The workflow is:
//! 1. Compute the expected paths from the declared tree
//! 2. Scan the output directory for the actual paths
//! 3. Plan skips, creates, and deletes
//! 4. Apply the plan in order, reporting progress

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::{
        Filesystem, OperationKind, ProgressEvent, ProgressObserver, to_native,
    },
    domain::{
        DomainError, Folder, HISTORY_DIR, IgnoreList, LogicalPath, MismatchKind, NodeKind, Walk,
    },
    error::RiteResult,
};

/// Options for one reconcile run.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Plan and report, but touch nothing.
    pub dry_run: bool,
    /// Basenames that are neither created, listed, nor deleted.
    pub ignore: IgnoreList,
    /// Copy file contents from this directory when a file of the same
    /// relative path exists there.
    pub copy_from: Option<PathBuf>,
    /// Paths that are never deleted, together with their ancestors.
    pub preserve: Vec<LogicalPath>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            ignore: IgnoreList::defaults(),
            copy_from: None,
            preserve: vec![LogicalPath::parse(HISTORY_DIR)],
        }
    }
}

/// One planned step. `path` is relative to the output root; the root itself
/// is the empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub path: LogicalPath,
    /// What the path is (or will be) on disk.
    pub node: NodeKind,
}

/// What a reconcile run did (or would do, for a dry run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub operations: Vec<Operation>,
    /// Soft failures, such as a copy that fell back to an empty file.
    pub warnings: Vec<String>,
}

impl ReconcileReport {
    pub fn count(&self, kind: OperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind == kind).count()
    }

    /// Number of operations other than `skip`.
    pub fn changes(&self) -> usize {
        self.operations.iter().filter(|op| op.kind.is_change()).count()
    }

    pub fn is_noop(&self) -> bool {
        self.changes() == 0
    }
}

/// Reconciliation engine.
pub struct ReconcileService {
    filesystem: Box<dyn Filesystem>,
}

impl ReconcileService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Compute the plan for syncing `output` to `declared` without applying it.
    ///
    /// Order: the root, then creates and skips in pre-order, then deletes
    /// deepest first.
    #[instrument(skip_all, fields(output = %output.display()))]
    pub fn plan(
        &self,
        declared: &Folder,
        output: &Path,
        options: &ReconcileOptions,
    ) -> RiteResult<Vec<Operation>> {
        check_conflicts(declared, &options.ignore)?;
        let expected = expected_paths(declared, &options.ignore);
        check_contained(&expected)?;

        let mut plan = Vec::new();
        match self.filesystem.entry_kind(output) {
            Some(NodeKind::Folder) => plan.push(skip(LogicalPath::root(), NodeKind::Folder)),
            Some(NodeKind::File) => {
                return Err(DomainError::FilesystemMismatch {
                    kind: MismatchKind::TypeMismatch,
                    path: output.display().to_string(),
                    expected: Some(NodeKind::Folder),
                }
                .into());
            }
            None => plan.push(Operation {
                kind: OperationKind::CreateFolder,
                path: LogicalPath::root(),
                node: NodeKind::Folder,
            }),
        }

        let scan = self.filesystem.scan(output, &options.ignore)?;
        let actual: BTreeMap<LogicalPath, NodeKind> = scan
            .entries
            .into_iter()
            .map(|entry| (entry.path, entry.kind))
            .collect();

        for (path, kind) in &expected {
            let op = match actual.get(path) {
                Some(found) if found == kind => skip(path.clone(), *kind),
                Some(_) => {
                    return Err(DomainError::FilesystemMismatch {
                        kind: MismatchKind::TypeMismatch,
                        path: path.to_string(),
                        expected: Some(*kind),
                    }
                    .into());
                }
                None => Operation {
                    kind: self.create_kind(path, *kind, options),
                    path: path.clone(),
                    node: *kind,
                },
            };
            plan.push(op);
        }

        let expected: BTreeSet<&LogicalPath> = expected.iter().map(|(path, _)| path).collect();
        let mut deletes: Vec<Operation> = actual
            .iter()
            .filter(|(path, _)| !expected.contains(path))
            .filter(|(path, _)| !is_kept(path, &options.preserve, &scan.ignored))
            .map(|(path, kind)| Operation {
                kind: OperationKind::Delete,
                path: path.clone(),
                node: *kind,
            })
            .collect();
        deletes.sort_by_cached_key(|op| {
            let text = op.path.to_string();
            (Reverse(text.len()), text)
        });
        plan.extend(deletes);

        debug!(operations = plan.len(), "planned reconcile");
        Ok(plan)
    }

    /// Plan and apply.
    ///
    /// The observer gets `on_start` with the plan size, then one event per
    /// operation. A dry run emits every event but performs no I/O. The first
    /// I/O error aborts the rest of the plan.
    #[instrument(skip_all, fields(output = %output.display(), dry_run = options.dry_run))]
    pub fn apply(
        &self,
        declared: &Folder,
        output: &Path,
        options: &ReconcileOptions,
        observer: &mut dyn ProgressObserver,
    ) -> RiteResult<ReconcileReport> {
        let plan = self.plan(declared, output, options)?;
        let mut report = ReconcileReport::default();

        observer.on_start(plan.len());
        for (idx, op) in plan.into_iter().enumerate() {
            if !options.dry_run {
                self.execute(&op, output, options, &mut report)?;
            }
            debug!(kind = %op.kind, path = %op.path, "reconcile step");
            observer.on_progress(&ProgressEvent {
                kind: op.kind,
                path: op.path.clone(),
                count: idx + 1,
            });
            report.operations.push(op);
        }

        info!(
            created = report.count(OperationKind::CreateFolder)
                + report.count(OperationKind::CreateFile),
            copied = report.count(OperationKind::Copy),
            deleted = report.count(OperationKind::Delete),
            skipped = report.count(OperationKind::Skip),
            "reconcile finished"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn create_kind(
        &self,
        path: &LogicalPath,
        kind: NodeKind,
        options: &ReconcileOptions,
    ) -> OperationKind {
        match (kind, &options.copy_from) {
            (NodeKind::Folder, _) => OperationKind::CreateFolder,
            (NodeKind::File, Some(source))
                if self.filesystem.entry_kind(&to_native(source, path)) == Some(NodeKind::File) =>
            {
                OperationKind::Copy
            }
            (NodeKind::File, _) => OperationKind::CreateFile,
        }
    }

    fn execute(
        &self,
        op: &Operation,
        output: &Path,
        options: &ReconcileOptions,
        report: &mut ReconcileReport,
    ) -> RiteResult<()> {
        let target = to_native(output, &op.path);
        match op.kind {
            OperationKind::Skip => Ok(()),
            OperationKind::CreateFolder => self.filesystem.create_dir_all(&target),
            OperationKind::CreateFile => self.filesystem.write_file(&target, b""),
            OperationKind::Copy => {
                let Some(source) = options.copy_from.as_deref() else {
                    return self.filesystem.write_file(&target, b"");
                };
                if let Err(err) = self
                    .filesystem
                    .copy_file(&to_native(source, &op.path), &target)
                {
                    warn!(path = %op.path, error = %err, "copy failed, writing empty file");
                    report
                        .warnings
                        .push(format!("Could not copy {}: {}", op.path, err));
                    self.filesystem.write_file(&target, b"")?;
                }
                Ok(())
            }
            OperationKind::Delete => match op.node {
                NodeKind::Folder => self.filesystem.remove_dir(&target),
                NodeKind::File => self.filesystem.remove_file(&target),
            },
        }
    }
}

fn skip(path: LogicalPath, node: NodeKind) -> Operation {
    Operation {
        kind: OperationKind::Skip,
        path,
        node,
    }
}

/// Declared paths below the root in pre-order, ignored subtrees pruned.
fn expected_paths(declared: &Folder, ignore: &IgnoreList) -> Vec<(LogicalPath, NodeKind)> {
    let mut out = Vec::new();
    declared.walk(&mut |node, path| {
        if ignore.contains(node.name()) {
            return Walk::Prune;
        }
        out.push((path.clone(), node.kind()));
        Walk::Continue
    });
    out
}

/// A file and a folder with one name under one parent cannot both exist on disk.
fn check_conflicts(declared: &Folder, ignore: &IgnoreList) -> Result<(), DomainError> {
    let mut clash = None;
    let mut visit = |folder: &Folder, at: &LogicalPath| {
        if clash.is_some() {
            return;
        }
        clash = folder
            .files()
            .find(|file| !ignore.contains(&file.name) && folder.subfolder(&file.name).is_some())
            .map(|file| at.join(file.name.as_str()));
    };

    visit(declared, &LogicalPath::root());
    declared.walk(&mut |node, path| match node.as_folder() {
        Some(_) if ignore.contains(node.name()) => Walk::Prune,
        Some(folder) => {
            visit(folder, path);
            Walk::Continue
        }
        None => Walk::Continue,
    });

    match clash {
        Some(path) => Err(DomainError::PathConflict {
            path: path.to_string(),
        }),
        None => Ok(()),
    }
}

/// Every declared path must stay below the output root.
fn check_contained(expected: &[(LogicalPath, NodeKind)]) -> Result<(), DomainError> {
    let escaping = expected.iter().find(|(path, _)| {
        path.segments()
            .iter()
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    });
    match escaping {
        Some((path, _)) => Err(DomainError::InvalidPath {
            path: path.to_string(),
            reason: "relative components are not allowed".into(),
        }),
        None => Ok(()),
    }
}

/// Preserved paths, their ancestors, and ancestors of ignored entries stay.
fn is_kept(path: &LogicalPath, preserve: &[LogicalPath], ignored: &[LogicalPath]) -> bool {
    preserve
        .iter()
        .any(|kept| path.starts_with(kept) || kept.starts_with(path))
        || ignored.iter().any(|entry| entry.starts_with(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockFilesystem, NoProgress, Scan, ScannedEntry};
    use crate::domain::Folder;

    fn declared() -> Folder {
        Folder::root()
            .with_folder(Folder::new("src").with_file("main.rs"))
            .with_file("README.md")
    }

    fn entry(path: &str, kind: NodeKind) -> ScannedEntry {
        ScannedEntry {
            path: LogicalPath::parse(path),
            kind,
        }
    }

    fn mock_with(root: Option<NodeKind>, scan: Scan) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_entry_kind()
            .withf(|p: &Path| p == Path::new("/out"))
            .return_const(root);
        fs.expect_scan().returning(move |_, _| Ok(scan.clone()));
        fs
    }

    fn kinds(plan: &[Operation]) -> Vec<(OperationKind, String)> {
        plan.iter().map(|op| (op.kind, op.path.to_string())).collect()
    }

    #[derive(Default)]
    struct Recorder {
        total: Option<usize>,
        events: Vec<ProgressEvent>,
    }

    impl ProgressObserver for Recorder {
        fn on_start(&mut self, total: usize) {
            self.total = Some(total);
        }

        fn on_progress(&mut self, event: &ProgressEvent) {
            self.events.push(event.clone());
        }
    }

    #[test]
    fn plans_creates_for_missing_output() {
        let fs = mock_with(None, Scan::default());
        let plan = ReconcileService::new(Box::new(fs))
            .plan(&declared(), Path::new("/out"), &ReconcileOptions::default())
            .unwrap();

        assert_eq!(
            kinds(&plan),
            [
                (OperationKind::CreateFolder, String::new()),
                (OperationKind::CreateFile, "README.md".into()),
                (OperationKind::CreateFolder, "src".into()),
                (OperationKind::CreateFile, "src/main.rs".into()),
            ]
        );
    }

    #[test]
    fn deletes_come_last_deepest_first_and_spare_history() {
        let scan = Scan {
            entries: vec![
                entry(".scaffoldrite", NodeKind::Folder),
                entry(".scaffoldrite/history", NodeKind::Folder),
                entry(".scaffoldrite/history/1.json", NodeKind::File),
                entry("README.md", NodeKind::File),
                entry("old", NodeKind::Folder),
                entry("old/deep", NodeKind::Folder),
                entry("old/deep/x.txt", NodeKind::File),
                entry("src", NodeKind::Folder),
                entry("src/main.rs", NodeKind::File),
            ],
            ignored: vec![],
        };
        let fs = mock_with(Some(NodeKind::Folder), scan);
        let plan = ReconcileService::new(Box::new(fs))
            .plan(&declared(), Path::new("/out"), &ReconcileOptions::default())
            .unwrap();

        let deletes: Vec<_> = plan
            .iter()
            .filter(|op| op.kind == OperationKind::Delete)
            .map(|op| op.path.to_string())
            .collect();
        assert_eq!(deletes, ["old/deep/x.txt", "old/deep", "old"]);
        assert_eq!(plan.last().unwrap().path.to_string(), "old");
        assert_eq!(plan[0].kind, OperationKind::Skip);
    }

    #[test]
    fn ancestors_of_ignored_entries_are_kept() {
        let scan = Scan {
            entries: vec![entry("web", NodeKind::Folder)],
            ignored: vec![LogicalPath::parse("web/node_modules")],
        };
        let fs = mock_with(Some(NodeKind::Folder), scan);
        let plan = ReconcileService::new(Box::new(fs))
            .plan(&Folder::root(), Path::new("/out"), &ReconcileOptions::default())
            .unwrap();
        assert!(plan.iter().all(|op| op.kind != OperationKind::Delete));
    }

    #[test]
    fn type_mismatch_fails_before_any_io() {
        let scan = Scan {
            entries: vec![entry("src", NodeKind::File)],
            ignored: vec![],
        };
        let mut fs = mock_with(Some(NodeKind::Folder), scan);
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();

        let err = ReconcileService::new(Box::new(fs))
            .apply(
                &declared(),
                Path::new("/out"),
                &ReconcileOptions::default(),
                &mut NoProgress,
            )
            .unwrap_err();
        assert!(err.to_string().contains("Expected a folder at src"));
    }

    #[test]
    fn same_name_file_and_folder_is_a_conflict() {
        let tree = Folder::root()
            .with_folder(Folder::new("a").with_folder(Folder::new("x")).with_file("x"));
        let mut fs = MockFilesystem::new();
        fs.expect_entry_kind().never();
        fs.expect_scan().never();

        let err = ReconcileService::new(Box::new(fs))
            .plan(&tree, Path::new("/out"), &ReconcileOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::RiteError::Domain(DomainError::PathConflict { ref path }) if path == "a/x"
        ));
    }

    #[test]
    fn relative_segments_never_reach_the_filesystem() {
        let tree = Folder::root().with_folder(Folder::new("..").with_file("escaped.txt"));
        let mut fs = MockFilesystem::new();
        fs.expect_entry_kind().never();
        fs.expect_scan().never();

        let err = ReconcileService::new(Box::new(fs))
            .plan(&tree, Path::new("/out"), &ReconcileOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::RiteError::Domain(DomainError::InvalidPath { ref path, .. }) if path == ".."
        ));
    }

    #[test]
    fn first_io_error_aborts_the_rest_of_the_plan() {
        let scan = Scan {
            entries: vec![entry("stale.txt", NodeKind::File)],
            ignored: vec![],
        };
        let mut fs = mock_with(Some(NodeKind::Folder), scan);
        fs.expect_create_dir_all()
            .withf(|p: &Path| p == Path::new("/out/src"))
            .times(1)
            .returning(|p| {
                Err(crate::application::ApplicationError::FilesystemError {
                    path: p.to_path_buf(),
                    reason: "disk full".into(),
                }
                .into())
            });
        fs.expect_write_file()
            .withf(|p, _| p == Path::new("/out/README.md"))
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_remove_file().never();
        fs.expect_remove_dir().never();

        let mut recorder = Recorder::default();
        let err = ReconcileService::new(Box::new(fs))
            .apply(
                &declared(),
                Path::new("/out"),
                &ReconcileOptions::default(),
                &mut recorder,
            )
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
        // skip root, create README.md, then src fails; main.rs and the delete never run
        assert_eq!(recorder.total, Some(5));
        let done: Vec<_> = recorder.events.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(done, ["", "README.md"]);
    }

    #[test]
    fn dry_run_emits_events_without_io() {
        let mut fs = mock_with(None, Scan::default());
        fs.expect_create_dir_all().never();
        fs.expect_write_file().never();
        fs.expect_remove_file().never();
        fs.expect_remove_dir().never();

        let mut recorder = Recorder::default();
        let options = ReconcileOptions {
            dry_run: true,
            ..ReconcileOptions::default()
        };
        let report = ReconcileService::new(Box::new(fs))
            .apply(&declared(), Path::new("/out"), &options, &mut recorder)
            .unwrap();

        assert_eq!(recorder.total, Some(4));
        let counts: Vec<_> = recorder.events.iter().map(|e| e.count).collect();
        assert_eq!(counts, [1, 2, 3, 4]);
        assert_eq!(report.changes(), 4);
    }

    #[test]
    fn failed_copy_falls_back_to_empty_file() {
        let mut fs = MockFilesystem::new();
        fs.expect_entry_kind()
            .returning(|p| (p != Path::new("/out")).then_some(NodeKind::File));
        fs.expect_scan().returning(|_, _| Ok(Scan::default()));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_copy_file().returning(|from, _| {
            Err(crate::application::ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "permission denied".into(),
            }
            .into())
        });
        fs.expect_write_file()
            .withf(|p, content| p == Path::new("/out/README.md") && content.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let options = ReconcileOptions {
            copy_from: Some(PathBuf::from("/src")),
            ..ReconcileOptions::default()
        };
        let report = ReconcileService::new(Box::new(fs))
            .apply(
                &Folder::root().with_file("README.md"),
                Path::new("/out"),
                &options,
                &mut NoProgress,
            )
            .unwrap();

        assert_eq!(report.count(OperationKind::Copy), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("README.md"));
    }
}
