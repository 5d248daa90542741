//! JSON history writer: one file per mutating command.

use std::path::PathBuf;

use scaffoldrite_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, HistoryEntry, HistoryWriter},
    },
    error::RiteResult,
};
use tracing::debug;

use crate::filesystem::LocalFilesystem;

/// Writes each entry to `<dir>/<id>-<command>.json`.
pub struct JsonHistoryWriter {
    dir: PathBuf,
    filesystem: Box<dyn Filesystem>,
}

impl JsonHistoryWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_filesystem(dir, Box::new(LocalFilesystem::new()))
    }

    pub fn with_filesystem(dir: impl Into<PathBuf>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            dir: dir.into(),
            filesystem,
        }
    }

    /// File an entry is written to.
    pub fn entry_path(&self, entry: &HistoryEntry) -> PathBuf {
        self.dir.join(format!("{}-{}.json", entry.id, entry.command))
    }
}

impl HistoryWriter for JsonHistoryWriter {
    fn record(&self, entry: &HistoryEntry) -> RiteResult<()> {
        let json = serde_json::to_vec_pretty(entry).map_err(|e| ApplicationError::History {
            reason: e.to_string(),
        })?;
        self.filesystem.create_dir_all(&self.dir)?;
        let path = self.entry_path(entry);
        self.filesystem.write_file(&path, &json)?;
        debug!(path = %path.display(), "recorded history");
        Ok(())
    }
}
