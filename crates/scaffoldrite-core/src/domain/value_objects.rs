//! Domain value objects: Scope, IgnoreList, and the reserved names.
//!
//! These are pure value types with equality by value and no identity.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ── Reserved names ───────────────────────────────────────────────────────────

/// Configuration directory kept next to the managed tree.
pub const CONFIG_DIR: &str = ".scaffoldrite";
pub const STRUCTURE_FILE: &str = "structure.sr";
pub const IGNORE_FILE: &str = ".scaffoldignore";
/// Audit snapshots, relative to the output root. Never deleted by a reconcile.
pub const HISTORY_DIR: &str = ".scaffoldrite/history";

/// Basenames skipped when no ignore file exists.
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    "coverage",
    ".turbo",
];

// ── Scope ────────────────────────────────────────────────────────────────────

/// Which folders an `eachFolder…` constraint inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// `*`: direct subfolders only.
    #[serde(rename = "*")]
    Direct,
    /// `**`: every folder in the subtree.
    #[serde(rename = "**")]
    Recursive,
}

impl Scope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "*",
            Self::Recursive => "**",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "*" => Ok(Self::Direct),
            "**" => Ok(Self::Recursive),
            other => Err(DomainError::InvalidName {
                name: other.to_string(),
                reason: "scope must be '*' or '**'".into(),
            }),
        }
    }
}

// ── IgnoreList ───────────────────────────────────────────────────────────────

/// Basenames that the importer, reconciler, and validators never touch.
///
/// Matching is exact on the final path component; there are no globs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreList(BTreeSet<String>);

impl IgnoreList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in list used when a project has no ignore file.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_IGNORES.iter().copied())
    }

    /// Parse `.scaffoldignore` content.
    ///
    /// One name per line; `#` starts a comment, blank lines are skipped.
    pub fn parse(content: &str) -> Self {
        Self::new(content.lines().filter_map(|line| {
            let name = line.split('#').next().unwrap_or("").trim();
            (!name.is_empty()).then(|| name.to_string())
        }))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Render back to ignore-file text.
    pub fn to_file_content(&self) -> String {
        let mut out = String::from("# Names skipped by scaffoldrite (one per line)\n");
        for name in &self.0 {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
