// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use std::fmt;

use thiserror::Error;

use crate::domain::entities::node::NodeKind;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (callers may report and keep going)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Structure text errors
    // ========================================================================
    #[error("[Line {line}] {message}")]
    Parse { line: usize, message: String },

    #[error("[Line {line}] Invalid constraint '{text}': {reason}")]
    Compile {
        line: usize,
        text: String,
        reason: String,
    },

    // ========================================================================
    // Validation failures
    // ========================================================================
    #[error("Constraint {keyword} failed at '{path}': {detail}")]
    ConstraintViolation {
        keyword: String,
        path: String,
        detail: String,
    },

    #[error("{}", mismatch_message(.kind, .path, .expected))]
    FilesystemMismatch {
        kind: MismatchKind,
        path: String,
        /// Declared kind, when one exists.
        expected: Option<NodeKind>,
    },

    // ========================================================================
    // Tree mutation errors
    // ========================================================================
    #[error("A {kind} named '{name}' already exists in '{parent}'")]
    DuplicateNode {
        kind: NodeKind,
        name: String,
        parent: String,
    },

    #[error("Path not found: {path}")]
    NodeNotFound { path: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("'{path}' is declared as both a file and a folder")]
    PathConflict { path: String },
}

/// Which side of an FS comparison is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    Missing,
    Extra,
    TypeMismatch,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "missing",
            Self::Extra => "extra",
            Self::TypeMismatch => "type-mismatch",
        })
    }
}

fn mismatch_message(kind: &MismatchKind, path: &str, expected: &Option<NodeKind>) -> String {
    match (*kind, *expected) {
        (MismatchKind::Missing, Some(k)) => format!("Missing {k}: {path}"),
        (MismatchKind::Missing, None) => format!("Missing: {path}"),
        (MismatchKind::Extra, _) => format!("Extra file or folder found: {path}"),
        (MismatchKind::TypeMismatch, Some(k)) => {
            format!("Expected a {k} at {path}, found a {}", other_kind(k))
        }
        (MismatchKind::TypeMismatch, None) => format!("Type mismatch at {path}"),
    }
}

fn other_kind(kind: NodeKind) -> NodeKind {
    match kind {
        NodeKind::File => NodeKind::Folder,
        NodeKind::Folder => NodeKind::File,
    }
}

impl DomainError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn violation(
        keyword: impl Into<String>,
        path: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::ConstraintViolation {
            keyword: keyword.into(),
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Parse { line, .. } => vec![
                format!("Check line {line} of structure.sr"),
                "Statements are 'folder NAME {', 'file NAME', '}' and 'constraints {'".into(),
            ],
            Self::Compile { line, .. } => vec![
                format!("Fix or remove the constraint on line {line}"),
                "Paths containing spaces must be quoted".into(),
            ],
            Self::ConstraintViolation { keyword, path, .. } => vec![
                format!("Adjust the structure so '{keyword}' holds for '{path}'"),
                "Or relax the constraint in the constraints block".into(),
            ],
            Self::FilesystemMismatch { kind, path, .. } => match kind {
                MismatchKind::Missing => vec![
                    "Run: scaffoldrite generate".into(),
                    format!("Or pass --allow-extra {path}"),
                ],
                MismatchKind::Extra => vec![
                    "Declare it with: scaffoldrite create".into(),
                    "Or pass --allow-extra to ignore extra entries".into(),
                    "Or add its name to .scaffoldrite/.scaffoldignore".into(),
                ],
                MismatchKind::TypeMismatch => vec![format!(
                    "Remove '{path}' from disk or change its declared type"
                )],
            },
            Self::DuplicateNode { .. } => vec![
                "Use --if-not-exists to skip existing entries".into(),
                "Use --force to replace the existing entry".into(),
            ],
            Self::NodeNotFound { .. } => vec!["Run: scaffoldrite list --structure".into()],
            Self::PathConflict { .. } => {
                vec!["A file and a folder cannot share one name on disk".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Parse { .. } | Self::Compile { .. } => ErrorCategory::Syntax,
            Self::ConstraintViolation { .. } | Self::FilesystemMismatch { .. } => {
                ErrorCategory::Validation
            }
            Self::DuplicateNode { .. } | Self::PathConflict { .. } => ErrorCategory::Conflict,
            Self::NodeNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidName { .. } | Self::InvalidPath { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Validation,
    Conflict,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_line() {
        let err = DomainError::parse(7, "Unexpected }");
        assert_eq!(err.to_string(), "[Line 7] Unexpected }");
        assert_eq!(err.category(), ErrorCategory::Syntax);
    }

    #[test]
    fn mismatch_messages() {
        let missing = DomainError::FilesystemMismatch {
            kind: MismatchKind::Missing,
            path: "src/index.ts".into(),
            expected: Some(NodeKind::File),
        };
        assert_eq!(missing.to_string(), "Missing file: src/index.ts");

        let wrong = DomainError::FilesystemMismatch {
            kind: MismatchKind::TypeMismatch,
            path: "src".into(),
            expected: Some(NodeKind::Folder),
        };
        assert_eq!(wrong.to_string(), "Expected a folder at src, found a file");
    }

    #[test]
    fn every_error_has_a_suggestion() {
        let errors = [
            DomainError::violation("require", "a", "missing"),
            DomainError::NodeNotFound { path: "x".into() },
            DomainError::InvalidName {
                name: "".into(),
                reason: "empty".into(),
            },
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty());
        }
    }
}
