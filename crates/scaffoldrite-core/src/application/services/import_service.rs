//! Filesystem importer: builds a declared tree from a real directory.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ScannedEntry},
    },
    domain::{CONFIG_DIR, Folder, IgnoreList, Node, NodeKind, ROOT_NAME},
    error::RiteResult,
};

/// Turns a directory into a [`Folder`] tree.
pub struct FsImporter {
    filesystem: Box<dyn Filesystem>,
}

impl FsImporter {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Import `dir`, skipping ignored basenames and the `.scaffoldrite`
    /// directory.
    ///
    /// The root folder is named after `dir`'s last component. Children are
    /// listed in name order.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn import(&self, dir: &Path, ignore: &IgnoreList) -> RiteResult<Folder> {
        if self.filesystem.entry_kind(dir) != Some(NodeKind::Folder) {
            return Err(ApplicationError::DirectoryNotFound {
                path: dir.to_path_buf(),
            }
            .into());
        }

        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(ROOT_NAME);
        let mut root = Folder::new(name);

        let scan = self.filesystem.scan(dir, ignore)?;
        for ScannedEntry { path, kind } in scan.entries {
            if path.segments().first().map(String::as_str) == Some(CONFIG_DIR) {
                continue;
            }
            let (Some(parent), Some(leaf)) = (path.parent(), path.file_name()) else {
                continue;
            };
            if let Some(folder) = root.find_folder_mut(&parent) {
                folder.push(Node::of_kind(kind, leaf));
            }
        }

        debug!(
            nodes = root.node_count(),
            ignored = scan.ignored.len(),
            "imported directory"
        );
        Ok(root)
    }
}
