//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `scaffoldrite-adapters` crate provides implementations.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{IgnoreList, LogicalPath, NodeKind};
use crate::error::RiteResult;

// ============================================================================
// Filesystem
// ============================================================================

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

/// An entry found by [`Filesystem::scan`], relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedEntry {
    pub path: LogicalPath,
    pub kind: NodeKind,
}

/// Result of a recursive scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// Non-ignored entries in pre-order, siblings sorted by name.
    pub entries: Vec<ScannedEntry>,
    /// Ignored entries that were seen but not descended into.
    pub ignored: Vec<LogicalPath>,
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `scaffoldrite_adapters::filesystem::LocalFilesystem` (production)
/// - `scaffoldrite_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Anything that is not a directory is reported as a file
/// - `remove_dir` only removes empty directories
/// - `read_dir` returns entries sorted by name
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Kind of the entry at `path`, or `None` when nothing is there.
    fn entry_kind(&self, path: &Path) -> Option<NodeKind>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool {
        self.entry_kind(path).is_some()
    }

    /// List a directory, sorted by name.
    fn read_dir(&self, path: &Path) -> RiteResult<Vec<DirEntry>>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> RiteResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &[u8]) -> RiteResult<()>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> RiteResult<Vec<u8>>;

    /// Copy bytes from `from` to `to`.
    fn copy_file(&self, from: &Path, to: &Path) -> RiteResult<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> RiteResult<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> RiteResult<()>;

    /// Remove a directory and everything in it.
    fn remove_dir_all(&self, path: &Path) -> RiteResult<()>;

    /// Move an entry.
    fn rename(&self, from: &Path, to: &Path) -> RiteResult<()>;

    /// Recursively list `root`, skipping ignored basenames.
    ///
    /// A missing root yields an empty scan.
    fn scan(&self, root: &Path, ignore: &IgnoreList) -> RiteResult<Scan> {
        let mut scan = Scan::default();
        if self.entry_kind(root) != Some(NodeKind::Folder) {
            return Ok(scan);
        }
        let mut pending = vec![LogicalPath::root()];
        while let Some(dir) = pending.pop() {
            for entry in self.read_dir(&to_native(root, &dir))? {
                let path = dir.join(entry.name.as_str());
                if ignore.contains(&entry.name) {
                    scan.ignored.push(path);
                    continue;
                }
                if entry.kind == NodeKind::Folder {
                    pending.push(path.clone());
                }
                scan.entries.push(ScannedEntry {
                    path,
                    kind: entry.kind,
                });
            }
        }
        Ok(sort_pre_order(scan))
    }
}

/// Join a logical path onto a native base directory.
pub fn to_native(base: &Path, path: &LogicalPath) -> std::path::PathBuf {
    let mut out = base.to_path_buf();
    for segment in path.segments() {
        out.push(segment);
    }
    out
}

/// Stable pre-order: parents before children, siblings by name.
fn sort_pre_order(mut scan: Scan) -> Scan {
    scan.entries.sort_by(|a, b| a.path.cmp(&b.path));
    scan.ignored.sort();
    scan
}

// ============================================================================
// Progress
// ============================================================================

/// What one reconcile step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    CreateFolder,
    CreateFile,
    Copy,
    Delete,
    Skip,
}

impl OperationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateFolder => "create-folder",
            Self::CreateFile => "create-file",
            Self::Copy => "copy",
            Self::Delete => "delete",
            Self::Skip => "skip",
        }
    }

    /// `true` for everything except `Skip`.
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Skip)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted once per plan entry, in plan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub kind: OperationKind,
    pub path: LogicalPath,
    /// 1-based position in the plan.
    pub count: usize,
}

/// Receives reconcile progress.
pub trait ProgressObserver {
    /// Called once with the plan size, before the first operation.
    fn on_start(&mut self, _total: usize) {}

    /// Called after each operation (or, in a dry run, instead of it).
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

// ============================================================================
// History
// ============================================================================

/// A structural change recorded by a mutating command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum HistoryOperation {
    Create { path: String, kind: NodeKind },
    Delete { path: String },
    Rename { from: String, to: String },
}

/// Audit record for one mutating command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub command: String,
    pub args: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub operations: Vec<HistoryOperation>,
    /// Serialized structure before the change.
    pub before: String,
    /// Serialized structure after the change, when it was applied.
    pub after: Option<String>,
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>, args: Vec<String>, before: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: command.into(),
            args,
            timestamp: Utc::now(),
            operations: Vec::new(),
            before,
            after: None,
        }
    }

    pub fn with_operation(mut self, operation: HistoryOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn finish(mut self, after: String) -> Self {
        self.after = Some(after);
        self
    }
}

/// Port for persisting audit entries.
pub trait HistoryWriter: Send + Sync {
    fn record(&self, entry: &HistoryEntry) -> RiteResult<()>;
}

/// Writer that drops every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistoryWriter for NoHistory {
    fn record(&self, _entry: &HistoryEntry) -> RiteResult<()> {
        Ok(())
    }
}

