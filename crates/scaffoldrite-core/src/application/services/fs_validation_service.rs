//! Read-only check that a directory matches a declared tree.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{DomainError, Folder, IgnoreList, LogicalPath, MismatchKind},
    error::RiteResult,
};

/// Options for [`FsValidator::validate`].
///
/// The default ignore list matches `ReconcileOptions::default()`.
#[derive(Debug, Clone)]
pub struct FsValidationOptions {
    pub ignore: IgnoreList,
    /// Accept every missing or extra entry.
    pub allow_extra: bool,
    /// Paths exempt from the missing/extra checks.
    ///
    /// A missing entry is exempt when its logical path equals or ends with
    /// an allow-list entry; an extra entry also matches by basename.
    pub allow_paths: Vec<String>,
}

impl Default for FsValidationOptions {
    fn default() -> Self {
        Self {
            ignore: IgnoreList::defaults(),
            allow_extra: false,
            allow_paths: Vec::new(),
        }
    }
}

impl FsValidationOptions {
    fn allows_missing(&self, path: &str) -> bool {
        self.allow_extra
            || self
                .allow_paths
                .iter()
                .map(|p| normalize(p))
                .any(|p| path == p || path.ends_with(p))
    }

    fn allows_extra(&self, name: &str, path: &str) -> bool {
        self.allow_extra
            || self
                .allow_paths
                .iter()
                .map(|p| normalize(p))
                .any(|p| name == p || path == p || path.ends_with(p))
    }
}

fn normalize(raw: &str) -> &str {
    raw.trim().trim_start_matches("./").trim_matches('/')
}

/// Compares a declared tree against a directory. Never writes.
pub struct FsValidator {
    filesystem: Box<dyn Filesystem>,
}

impl FsValidator {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Check `dir` against `declared`, stopping at the first mismatch.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn validate(
        &self,
        declared: &Folder,
        dir: &Path,
        options: &FsValidationOptions,
    ) -> RiteResult<()> {
        self.check_level(declared, dir, &LogicalPath::root(), options)?;
        debug!("filesystem matches structure");
        Ok(())
    }

    fn check_level(
        &self,
        folder: &Folder,
        dir: &Path,
        at: &LogicalPath,
        options: &FsValidationOptions,
    ) -> RiteResult<()> {
        if self.filesystem.entry_kind(dir).is_none() {
            return Err(ApplicationError::DirectoryNotFound {
                path: dir.to_path_buf(),
            }
            .into());
        }

        for child in &folder.children {
            if options.ignore.contains(child.name()) {
                continue;
            }
            let path = at.join(child.name());
            let native = dir.join(child.name());

            match self.filesystem.entry_kind(&native) {
                None if options.allows_missing(&path.to_string()) => {}
                None => {
                    return Err(mismatch(MismatchKind::Missing, &path, child.kind()));
                }
                Some(found) if found != child.kind() => {
                    return Err(mismatch(MismatchKind::TypeMismatch, &path, child.kind()));
                }
                Some(_) => {
                    if let Some(sub) = child.as_folder() {
                        self.check_level(sub, &native, &path, options)?;
                    }
                }
            }
        }

        for entry in self.filesystem.read_dir(dir)? {
            if options.ignore.contains(&entry.name) || folder.has_child(&entry.name) {
                continue;
            }
            let path = at.join(entry.name.as_str());
            if !options.allows_extra(&entry.name, &path.to_string()) {
                return Err(DomainError::FilesystemMismatch {
                    kind: MismatchKind::Extra,
                    path: path.to_string(),
                    expected: None,
                }
                .into());
            }
        }
        Ok(())
    }
}

fn mismatch(
    kind: MismatchKind,
    path: &LogicalPath,
    expected: crate::domain::NodeKind,
) -> crate::error::RiteError {
    DomainError::FilesystemMismatch {
        kind,
        path: path.to_string(),
        expected: Some(expected),
    }
    .into()
}
