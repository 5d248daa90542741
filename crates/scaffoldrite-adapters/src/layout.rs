//! Where a project keeps its Scaffoldrite files.
//!
//! ```text
//! <base>/
//! ├── .scaffoldignore
//! └── .scaffoldrite/
//!     ├── structure.sr
//!     └── history/
//! ```

use std::path::{Path, PathBuf};

use scaffoldrite_core::{
    application::ports::Filesystem,
    domain::{CONFIG_DIR, HISTORY_DIR, IGNORE_FILE, IgnoreList, STRUCTURE_FILE, Structure},
    error::{Context, RiteResult},
};
use tracing::{debug, instrument};

use crate::filesystem::LocalFilesystem;

/// Paths and persistence for one project directory.
pub struct ProjectLayout {
    base: PathBuf,
    filesystem: Box<dyn Filesystem>,
}

impl ProjectLayout {
    /// Layout rooted at `base`, backed by the local filesystem.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self::with_filesystem(base, Box::new(LocalFilesystem::new()))
    }

    pub fn with_filesystem(base: impl Into<PathBuf>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            base: base.into(),
            filesystem,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_dir(&self) -> PathBuf {
        self.base.join(CONFIG_DIR)
    }

    pub fn structure_path(&self) -> PathBuf {
        self.config_dir().join(STRUCTURE_FILE)
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.base.join(IGNORE_FILE)
    }

    pub fn history_dir(&self) -> PathBuf {
        self.base.join(HISTORY_DIR)
    }

    /// `true` once `structure.sr` exists.
    pub fn is_initialized(&self) -> bool {
        self.filesystem.exists(&self.structure_path())
    }

    /// Read and parse `structure.sr`.
    #[instrument(skip_all, fields(base = %self.base.display()))]
    pub fn load_structure(&self) -> RiteResult<Structure> {
        let path = self.structure_path();
        let bytes = self.filesystem.read_file(&path)?;
        let text = String::from_utf8(bytes).context(format!("{} is not UTF-8", path.display()))?;
        let structure = Structure::parse(&text)?;
        debug!(nodes = structure.root.node_count(), "loaded structure");
        Ok(structure)
    }

    /// Serialize and write `structure.sr`, creating the config directory.
    #[instrument(skip_all, fields(base = %self.base.display()))]
    pub fn save_structure(&self, structure: &Structure) -> RiteResult<()> {
        self.filesystem.create_dir_all(&self.config_dir())?;
        self.filesystem
            .write_file(&self.structure_path(), structure.to_sr().as_bytes())
    }

    /// The project's ignore list, or the defaults when there is no ignore file.
    pub fn load_ignore_list(&self) -> RiteResult<IgnoreList> {
        let path = self.ignore_path();
        if !self.filesystem.exists(&path) {
            return Ok(IgnoreList::defaults());
        }
        let bytes = self.filesystem.read_file(&path)?;
        Ok(IgnoreList::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn write_ignore_file(&self, ignore: &IgnoreList) -> RiteResult<()> {
        self.filesystem
            .write_file(&self.ignore_path(), ignore.to_file_content().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;

    fn layout(fs: &MemoryFilesystem) -> ProjectLayout {
        ProjectLayout::with_filesystem("/proj", Box::new(fs.clone()))
    }

    #[test]
    fn paths_follow_the_config_dir() {
        let layout = ProjectLayout::new("/proj");
        assert_eq!(
            layout.structure_path(),
            Path::new("/proj/.scaffoldrite/structure.sr")
        );
        assert_eq!(layout.ignore_path(), Path::new("/proj/.scaffoldignore"));
        assert_eq!(
            layout.history_dir(),
            Path::new("/proj/.scaffoldrite/history")
        );
    }

    #[test]
    fn save_then_load_structure() {
        let fs = MemoryFilesystem::new().with_dir("/proj");
        let layout = layout(&fs);
        assert!(!layout.is_initialized());

        let structure = Structure::parse("folder src {\n  file main.rs\n}\n").unwrap();
        layout.save_structure(&structure).unwrap();

        assert!(layout.is_initialized());
        let loaded = layout.load_structure().unwrap();
        assert!(loaded.root.same_shape(&structure.root));
    }

    #[test]
    fn ignore_list_defaults_when_absent() {
        let fs = MemoryFilesystem::new().with_dir("/proj");
        let layout = layout(&fs);
        assert!(layout.load_ignore_list().unwrap().contains("node_modules"));

        layout
            .write_ignore_file(&IgnoreList::new(["target"]))
            .unwrap();
        let custom = layout.load_ignore_list().unwrap();
        assert!(custom.contains("target"));
        assert!(!custom.contains("node_modules"));
    }

    #[test]
    fn parse_errors_surface_from_load() {
        let fs = MemoryFilesystem::new().with_file("/proj/.scaffoldrite/structure.sr", "file a\n}\n");
        let err = layout(&fs).load_structure().unwrap_err();
        assert!(err.to_string().contains("[Line 2]"));
    }
}
