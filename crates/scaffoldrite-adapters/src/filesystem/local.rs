//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use scaffoldrite_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem, Scan, ScannedEntry},
    },
    domain::{IgnoreList, LogicalPath, NodeKind},
    error::{RiteError, RiteResult},
};
use tracing::trace;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Symbolic links are never followed. A link is a file, whatever it points
/// at, in `entry_kind`, `read_dir` and `scan` alike, so deleting one never
/// reaches into its target.
impl Filesystem for LocalFilesystem {
    fn entry_kind(&self, path: &Path) -> Option<NodeKind> {
        let metadata = std::fs::symlink_metadata(path).ok()?;
        Some(if metadata.is_dir() {
            NodeKind::Folder
        } else {
            NodeKind::File
        })
    }

    fn read_dir(&self, path: &Path) -> RiteResult<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))? {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory"))?;
            let kind = match entry.file_type() {
                Ok(ft) if ft.is_dir() => NodeKind::Folder,
                Ok(_) => NodeKind::File,
                Err(e) => return Err(map_io_error(&entry.path(), e, "stat")),
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> RiteResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> RiteResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> RiteResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> RiteResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn remove_file(&self, path: &Path) -> RiteResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir(&self, path: &Path) -> RiteResult<()> {
        std::fs::remove_dir(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn remove_dir_all(&self, path: &Path) -> RiteResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn rename(&self, from: &Path, to: &Path) -> RiteResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    /// Walk with `walkdir`, pruning ignored directories in `filter_entry`.
    fn scan(&self, root: &Path, ignore: &IgnoreList) -> RiteResult<Scan> {
        let mut scan = Scan::default();
        if self.entry_kind(root) != Some(NodeKind::Folder) {
            return Ok(scan);
        }

        let mut ignored = Vec::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let skip = entry.depth() > 0
                    && ignore.contains(&entry.file_name().to_string_lossy());
                if skip {
                    ignored.push(logical(root, entry.path()));
                }
                !skip
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                map_io_error(&path, io::Error::other(e.to_string()), "scan directory")
            })?;
            let kind = if entry.file_type().is_dir() {
                NodeKind::Folder
            } else {
                NodeKind::File
            };
            trace!(path = %entry.path().display(), "scanned");
            scan.entries.push(ScannedEntry {
                path: logical(root, entry.path()),
                kind,
            });
        }

        scan.ignored = ignored;
        scan.entries.sort_by(|a, b| a.path.cmp(&b.path));
        scan.ignored.sort();
        Ok(scan)
    }
}

/// `path` relative to `root`, as a logical path.
fn logical(root: &Path, path: &Path) -> LogicalPath {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .fold(LogicalPath::root(), |acc, c| {
            acc.join(c.as_os_str().to_string_lossy().into_owned())
        })
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> RiteError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scan_lists_pre_order_and_prunes_ignored() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/bin")).unwrap();
        std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        std::fs::write(root.join("src/bin/cli.rs"), "").unwrap();
        std::fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        std::fs::write(root.join("README.md"), "").unwrap();

        let scan = LocalFilesystem::new()
            .scan(root, &IgnoreList::defaults())
            .unwrap();
        let paths: Vec<_> = scan.entries.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["README.md", "src", "src/bin", "src/bin/cli.rs"]);
        assert_eq!(scan.ignored, [LogicalPath::parse("node_modules")]);
    }

    #[test]
    fn remove_dir_refuses_non_empty_directory() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("full");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("x"), "").unwrap();

        let fs = LocalFilesystem::new();
        assert!(fs.remove_dir(&target).is_err());
        assert_eq!(fs.entry_kind(&target), Some(NodeKind::Folder));
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlink_is_a_file_everywhere() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("real")).unwrap();
        std::fs::write(root.join("real/inner.txt"), "").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let fs = LocalFilesystem::new();
        assert_eq!(fs.entry_kind(&root.join("link")), Some(NodeKind::File));

        let listed = fs.read_dir(root).unwrap();
        let link = listed.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.kind, NodeKind::File);

        let scan = fs.scan(root, &IgnoreList::empty()).unwrap();
        let paths: Vec<_> = scan.entries.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["link", "real", "real/inner.txt"]);
        assert_eq!(scan.entries[0].kind, NodeKind::File);
    }

    #[test]
    fn missing_root_scans_empty() {
        let dir = TempDir::new().unwrap();
        let scan = LocalFilesystem::new()
            .scan(&dir.path().join("absent"), &IgnoreList::empty())
            .unwrap();
        assert!(scan.entries.is_empty());
    }
}
