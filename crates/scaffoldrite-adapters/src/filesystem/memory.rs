//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use scaffoldrite_core::{
    application::{
        ApplicationError,
        ports::{DirEntry, Filesystem},
    },
    domain::NodeKind,
    error::RiteResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to a service and
/// inspect the other.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn kind(&self, path: &Path) -> Option<NodeKind> {
        if self.directories.contains(path) {
            Some(NodeKind::Folder)
        } else if self.files.contains_key(path) {
            Some(NodeKind::File)
        } else {
            None
        }
    }

    fn has_children(&self, path: &Path) -> bool {
        self.directories
            .iter()
            .chain(self.files.keys())
            .any(|p| p.parent() == Some(path))
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Create a directory tree, then a file with `content` (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path.to_path_buf(), content.as_bytes().to_vec());
        }
        self
    }

    /// Create a directory and its parents (testing helper).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            insert_ancestors(&mut inner.directories, path.as_ref());
        }
        self
    }

    /// Read a file's content as text (testing helper).
    pub fn contents(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }

    fn lock_read(&self) -> RiteResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn lock_write(&self) -> RiteResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn fs_error(path: &Path, reason: &str) -> ApplicationError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

impl Filesystem for MemoryFilesystem {
    fn entry_kind(&self, path: &Path) -> Option<NodeKind> {
        self.inner.read().ok()?.kind(path)
    }

    fn read_dir(&self, path: &Path) -> RiteResult<Vec<DirEntry>> {
        let inner = self.lock_read()?;
        if inner.kind(path) != Some(NodeKind::Folder) {
            return Err(fs_error(path, "Not a directory").into());
        }
        let folders = inner
            .directories
            .iter()
            .map(|p| (p, NodeKind::Folder));
        let files = inner.files.keys().map(|p| (p, NodeKind::File));
        let mut entries: Vec<DirEntry> = folders
            .chain(files)
            .filter(|(p, _)| p.parent() == Some(path))
            .filter_map(|(p, kind)| {
                Some(DirEntry {
                    name: p.file_name()?.to_string_lossy().into_owned(),
                    kind,
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn create_dir_all(&self, path: &Path) -> RiteResult<()> {
        let mut inner = self.lock_write()?;
        if inner.files.contains_key(path) {
            return Err(fs_error(path, "A file exists at this path").into());
        }
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> RiteResult<()> {
        let mut inner = self.lock_write()?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(fs_error(path, "Parent directory does not exist").into());
            }
        }
        if inner.directories.contains(path) {
            return Err(fs_error(path, "Is a directory").into());
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> RiteResult<Vec<u8>> {
        let inner = self.lock_read()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "No such file").into())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> RiteResult<()> {
        let content = self.read_file(from)?;
        self.write_file(to, &content)
    }

    fn remove_file(&self, path: &Path) -> RiteResult<()> {
        let mut inner = self.lock_write()?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| fs_error(path, "No such file").into())
    }

    fn remove_dir(&self, path: &Path) -> RiteResult<()> {
        let mut inner = self.lock_write()?;
        if !inner.directories.contains(path) {
            return Err(fs_error(path, "No such directory").into());
        }
        if inner.has_children(path) {
            return Err(fs_error(path, "Directory not empty").into());
        }
        inner.directories.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> RiteResult<()> {
        let mut inner = self.lock_write()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> RiteResult<()> {
        let mut inner = self.lock_write()?;
        if inner.kind(from).is_none() {
            return Err(fs_error(from, "No such file or directory").into());
        }
        let moved = |p: &PathBuf| match p.strip_prefix(from) {
            Ok(rest) if rest.as_os_str().is_empty() => to.to_path_buf(),
            Ok(rest) => to.join(rest),
            Err(_) => p.clone(),
        };
        let directories = inner.directories.iter().map(&moved).collect();
        inner.directories = directories;
        inner.files = std::mem::take(&mut inner.files)
            .into_iter()
            .map(|(p, content)| (moved(&p), content))
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), b"").is_err());
        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), b"hi").unwrap();
        assert_eq!(fs.contents(Path::new("/a/b.txt")).as_deref(), Some("hi"));
    }

    #[test]
    fn read_dir_lists_direct_children_sorted() {
        let fs = MemoryFilesystem::new()
            .with_file("/p/z.txt", "")
            .with_file("/p/src/main.rs", "")
            .with_dir("/p/docs");
        let names: Vec<_> = fs
            .read_dir(Path::new("/p"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["docs", "src", "z.txt"]);
    }

    #[test]
    fn remove_dir_only_when_empty() {
        let fs = MemoryFilesystem::new().with_file("/p/a/x", "");
        assert!(fs.remove_dir(Path::new("/p/a")).is_err());
        fs.remove_file(Path::new("/p/a/x")).unwrap();
        fs.remove_dir(Path::new("/p/a")).unwrap();
        assert_eq!(fs.entry_kind(Path::new("/p/a")), None);
    }

    #[test]
    fn rename_moves_subtree() {
        let fs = MemoryFilesystem::new().with_file("/p/old/x.rs", "x");
        fs.rename(Path::new("/p/old"), Path::new("/p/new")).unwrap();
        assert_eq!(fs.contents(Path::new("/p/new/x.rs")).as_deref(), Some("x"));
        assert_eq!(fs.entry_kind(Path::new("/p/old")), None);
    }
}
