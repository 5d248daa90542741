//! Typed structural policy.
//!
//! Constraints are compiled from the raw lines of a `constraints { }` block
//! (see [`compiler`]) and evaluated against a tree by
//! [`ConstraintValidator`](crate::domain::validation::ConstraintValidator).
//! Every variant renders back to its canonical source line via `Display`.

pub mod compiler;

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{common::LogicalPath, error::DomainError, value_objects::Scope};

pub use compiler::{compile_constraints, split_args};

// ── ConstraintKind ───────────────────────────────────────────────────────────

/// The 18 constraint keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Require,
    Forbid,
    MaxFiles,
    MinFiles,
    MaxFolders,
    MinFolders,
    MaxFilesByExt,
    MaxFilesRecursive,
    MaxFoldersRecursive,
    MaxFilesByExtRecursive,
    MustContain,
    MustHaveFile,
    FileNameRegex,
    MaxDepth,
    EachFolderMustContain,
    EachFolderMustContainFile,
    EachFolderMustContainFolder,
    EachFolderMustHaveExt,
}

impl ConstraintKind {
    pub const ALL: [Self; 18] = [
        Self::Require,
        Self::Forbid,
        Self::MaxFiles,
        Self::MinFiles,
        Self::MaxFolders,
        Self::MinFolders,
        Self::MaxFilesByExt,
        Self::MaxFilesRecursive,
        Self::MaxFoldersRecursive,
        Self::MaxFilesByExtRecursive,
        Self::MustContain,
        Self::MustHaveFile,
        Self::FileNameRegex,
        Self::MaxDepth,
        Self::EachFolderMustContain,
        Self::EachFolderMustContainFile,
        Self::EachFolderMustContainFolder,
        Self::EachFolderMustHaveExt,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Require => "require",
            Self::Forbid => "forbid",
            Self::MaxFiles => "maxFiles",
            Self::MinFiles => "minFiles",
            Self::MaxFolders => "maxFolders",
            Self::MinFolders => "minFolders",
            Self::MaxFilesByExt => "maxFilesByExt",
            Self::MaxFilesRecursive => "maxFilesRecursive",
            Self::MaxFoldersRecursive => "maxFoldersRecursive",
            Self::MaxFilesByExtRecursive => "maxFilesByExtRecursive",
            Self::MustContain => "mustContain",
            Self::MustHaveFile => "mustHaveFile",
            Self::FileNameRegex => "fileNameRegex",
            Self::MaxDepth => "maxDepth",
            Self::EachFolderMustContain => "eachFolderMustContain",
            Self::EachFolderMustContainFile => "eachFolderMustContainFile",
            Self::EachFolderMustContainFolder => "eachFolderMustContainFolder",
            Self::EachFolderMustHaveExt => "eachFolderMustHaveExt",
        }
    }

    pub const fn is_scoped(&self) -> bool {
        matches!(
            self,
            Self::EachFolderMustContain
                | Self::EachFolderMustContainFile
                | Self::EachFolderMustContainFolder
                | Self::EachFolderMustHaveExt
        )
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::InvalidName {
                name: s.to_string(),
                reason: "unknown constraint keyword".into(),
            })
    }
}

// ── Pattern ──────────────────────────────────────────────────────────────────

/// A compiled `fileNameRegex` pattern that keeps its source text.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.0.is_match(name)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(serde::de::Error::custom)
    }
}

// ── Constraint ───────────────────────────────────────────────────────────────

/// One compiled constraint.
///
/// Every variant targets a logical `path`; the empty path is the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Constraint {
    Require { path: LogicalPath },
    Forbid { path: LogicalPath },
    MaxFiles { path: LogicalPath, value: usize },
    MinFiles { path: LogicalPath, value: usize },
    MaxFolders { path: LogicalPath, value: usize },
    MinFolders { path: LogicalPath, value: usize },
    MaxFilesByExt { path: LogicalPath, ext: String, value: usize },
    MaxFilesRecursive { path: LogicalPath, value: usize },
    MaxFoldersRecursive { path: LogicalPath, value: usize },
    MaxFilesByExtRecursive { path: LogicalPath, ext: String, value: usize },
    MustContain { path: LogicalPath, value: String },
    MustHaveFile { path: LogicalPath, value: String },
    FileNameRegex { path: LogicalPath, regex: Pattern },
    MaxDepth { path: LogicalPath, value: usize },
    EachFolderMustContain { scope: Scope, path: LogicalPath, value: String },
    EachFolderMustContainFile { scope: Scope, path: LogicalPath, value: String },
    EachFolderMustContainFolder { scope: Scope, path: LogicalPath, value: String },
    EachFolderMustHaveExt { scope: Scope, path: LogicalPath, ext: String },
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::Require { .. } => ConstraintKind::Require,
            Self::Forbid { .. } => ConstraintKind::Forbid,
            Self::MaxFiles { .. } => ConstraintKind::MaxFiles,
            Self::MinFiles { .. } => ConstraintKind::MinFiles,
            Self::MaxFolders { .. } => ConstraintKind::MaxFolders,
            Self::MinFolders { .. } => ConstraintKind::MinFolders,
            Self::MaxFilesByExt { .. } => ConstraintKind::MaxFilesByExt,
            Self::MaxFilesRecursive { .. } => ConstraintKind::MaxFilesRecursive,
            Self::MaxFoldersRecursive { .. } => ConstraintKind::MaxFoldersRecursive,
            Self::MaxFilesByExtRecursive { .. } => ConstraintKind::MaxFilesByExtRecursive,
            Self::MustContain { .. } => ConstraintKind::MustContain,
            Self::MustHaveFile { .. } => ConstraintKind::MustHaveFile,
            Self::FileNameRegex { .. } => ConstraintKind::FileNameRegex,
            Self::MaxDepth { .. } => ConstraintKind::MaxDepth,
            Self::EachFolderMustContain { .. } => ConstraintKind::EachFolderMustContain,
            Self::EachFolderMustContainFile { .. } => ConstraintKind::EachFolderMustContainFile,
            Self::EachFolderMustContainFolder { .. } => {
                ConstraintKind::EachFolderMustContainFolder
            }
            Self::EachFolderMustHaveExt { .. } => ConstraintKind::EachFolderMustHaveExt,
        }
    }

    pub fn path(&self) -> &LogicalPath {
        match self {
            Self::Require { path }
            | Self::Forbid { path }
            | Self::MaxFiles { path, .. }
            | Self::MinFiles { path, .. }
            | Self::MaxFolders { path, .. }
            | Self::MinFolders { path, .. }
            | Self::MaxFilesByExt { path, .. }
            | Self::MaxFilesRecursive { path, .. }
            | Self::MaxFoldersRecursive { path, .. }
            | Self::MaxFilesByExtRecursive { path, .. }
            | Self::MustContain { path, .. }
            | Self::MustHaveFile { path, .. }
            | Self::FileNameRegex { path, .. }
            | Self::MaxDepth { path, .. }
            | Self::EachFolderMustContain { path, .. }
            | Self::EachFolderMustContainFile { path, .. }
            | Self::EachFolderMustContainFolder { path, .. }
            | Self::EachFolderMustHaveExt { path, .. } => path,
        }
    }
}

/// Quote an argument if the splitter would otherwise break it apart.
fn arg(s: &str) -> String {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        format!("\"{s}\"")
    } else {
        s.to_string()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kw = self.kind();
        match self {
            Self::Require { path } | Self::Forbid { path } => write!(f, "{kw} {path}"),
            Self::MaxFiles { path, value }
            | Self::MinFiles { path, value }
            | Self::MaxFolders { path, value }
            | Self::MinFolders { path, value }
            | Self::MaxFilesRecursive { path, value }
            | Self::MaxFoldersRecursive { path, value }
            | Self::MaxDepth { path, value } => write!(f, "{kw} {value} {}", arg(&path.to_string())),
            Self::MaxFilesByExt { path, ext, value }
            | Self::MaxFilesByExtRecursive { path, ext, value } => {
                write!(f, "{kw} {} {value} {}", arg(ext), arg(&path.to_string()))
            }
            Self::MustContain { path, value } | Self::MustHaveFile { path, value } => {
                write!(f, "{kw} {} {}", arg(&path.to_string()), arg(value))
            }
            Self::FileNameRegex { path, regex } => {
                write!(f, "{kw} {} {}", arg(&path.to_string()), arg(regex.as_str()))
            }
            Self::EachFolderMustContain { scope, path, value }
            | Self::EachFolderMustContainFile { scope, path, value }
            | Self::EachFolderMustContainFolder { scope, path, value }
            | Self::EachFolderMustHaveExt {
                scope,
                path,
                ext: value,
            } => {
                if path.is_root() {
                    write!(f, "{kw} {scope} {}", arg(value))
                } else {
                    write!(f, "{kw} {scope} {} {}", arg(&path.to_string()), arg(value))
                }
            }
        }
    }
}
