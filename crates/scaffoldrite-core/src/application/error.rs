//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not structure
//! logic. Structure errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A directory that must exist does not.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Shared adapter state is unusable (lock poisoned).
    #[error("Adapter state lock poisoned")]
    StoreLockError,

    /// An audit entry could not be written.
    #[error("Failed to record history: {reason}")]
    History { reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Re-running the command resumes an interrupted sync".into(),
            ],
            Self::DirectoryNotFound { path } => vec![
                format!("Create it first: mkdir -p {}", path.display()),
                "Or pass a different directory".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
            Self::History { .. } => vec![
                "Check permissions on .scaffoldrite/history".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::History { .. } => ErrorCategory::Io,
            Self::DirectoryNotFound { .. } => ErrorCategory::NotFound,
            Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
