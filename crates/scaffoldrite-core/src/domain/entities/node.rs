//! The declared tree: folders own their children, files are leaves.
//!
//! Ownership is strictly top-down. A [`Folder`] exclusively owns its
//! `children`, nothing points back up, and every traversal starts at the
//! root, so no shared ownership or parent links are needed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{common::LogicalPath, error::DomainError, value_objects::Scope};

/// Name of the synthetic root folder. Never emitted, never accepted as input.
pub const ROOT_NAME: &str = "__root__";

/// Discriminant of a [`Node`].
///
/// The derived ordering puts folders before files, which is the canonical
/// serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    File,
}

impl NodeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "folder" | "dir" | "directory" => Ok(Self::Folder),
            "file" => Ok(Self::File),
            other => Err(DomainError::InvalidName {
                name: other.to_string(),
                reason: "node kind must be 'file' or 'folder'".into(),
            }),
        }
    }
}

/// A file or folder entry in the declared tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    File(File),
}

impl Node {
    pub fn folder(name: impl Into<String>) -> Self {
        Self::Folder(Folder::new(name))
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::File(File::new(name))
    }

    /// Build an empty node of the given kind.
    pub fn of_kind(kind: NodeKind, name: impl Into<String>) -> Self {
        match kind {
            NodeKind::Folder => Self::folder(name),
            NodeKind::File => Self::file(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Folder(f) => &f.name,
            Self::File(f) => &f.name,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Self::Folder(f) => f.name = name,
            Self::File(f) => f.name = name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Folder(_) => NodeKind::Folder,
            Self::File(_) => NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(f) => Some(f),
            Self::File(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Self::Folder(f) => Some(f),
            Self::File(_) => None,
        }
    }
}

/// A leaf entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
}

impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Returned by a [`Folder::walk`] visitor to control descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Do not visit the children of this folder.
    Prune,
}

/// A folder and the ordered children it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// The synthetic root of a parsed structure.
    pub fn root() -> Self {
        Self::new(ROOT_NAME)
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_NAME
    }

    /// Fluent child insertion, mostly for building trees in tests.
    pub fn with_child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn with_file(self, name: impl Into<String>) -> Self {
        self.with_child(Node::file(name))
    }

    pub fn with_folder(self, folder: Folder) -> Self {
        self.with_child(Node::Folder(folder))
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    // ── lookup ──────────────────────────────────────────────────────────────

    /// First direct child with this name and kind.
    pub fn child(&self, name: &str, kind: NodeKind) -> Option<&Node> {
        self.children
            .iter()
            .find(|c| c.kind() == kind && c.name() == name)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.name() == name)
    }

    pub fn has_child_of_kind(&self, name: &str, kind: NodeKind) -> bool {
        self.child(name, kind).is_some()
    }

    pub fn subfolder(&self, name: &str) -> Option<&Folder> {
        self.child(name, NodeKind::Folder).and_then(Node::as_folder)
    }

    pub fn subfolder_mut(&mut self, name: &str) -> Option<&mut Folder> {
        self.children
            .iter_mut()
            .find(|c| c.is_folder() && c.name() == name)
            .and_then(Node::as_folder_mut)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.children.iter().filter_map(|c| match c {
            Node::File(f) => Some(f),
            Node::Folder(_) => None,
        })
    }

    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.children.iter().filter_map(Node::as_folder)
    }

    /// Resolve a logical path below this folder.
    ///
    /// Intermediate segments must name folders. The final segment matches a
    /// folder first, then a file, so a same-named file/folder pair resolves
    /// to the folder. The root path has no node and yields `None`; use
    /// [`Folder::find_folder`] when the root itself is a valid answer.
    pub fn find(&self, path: &LogicalPath) -> Option<&Node> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = self;
        for segment in parents {
            current = current.subfolder(segment)?;
        }
        current
            .child(last, NodeKind::Folder)
            .or_else(|| current.child(last, NodeKind::File))
    }

    /// Resolve a logical path to a folder; the root path resolves to `self`.
    pub fn find_folder(&self, path: &LogicalPath) -> Option<&Folder> {
        let mut current = self;
        for segment in path.segments() {
            current = current.subfolder(segment)?;
        }
        Some(current)
    }

    pub fn find_folder_mut(&mut self, path: &LogicalPath) -> Option<&mut Folder> {
        let mut current = self;
        for segment in path.segments() {
            current = current.subfolder_mut(segment)?;
        }
        Some(current)
    }

    /// `true` if the path resolves to this folder or any node below it.
    pub fn contains_path(&self, path: &LogicalPath) -> bool {
        path.is_root() || self.find(path).is_some()
    }

    // ── traversal ───────────────────────────────────────────────────────────

    /// Pre-order traversal of every node below this folder.
    ///
    /// The visitor receives each node with its logical path relative to
    /// `self`; `self` is never visited and contributes no path segment.
    pub fn walk<F>(&self, visitor: &mut F)
    where
        F: FnMut(&Node, &LogicalPath) -> Walk,
    {
        self.walk_from(&LogicalPath::root(), visitor);
    }

    fn walk_from<F>(&self, base: &LogicalPath, visitor: &mut F)
    where
        F: FnMut(&Node, &LogicalPath) -> Walk,
    {
        for child in &self.children {
            let path = base.join(child.name());
            if visitor(child, &path) == Walk::Prune {
                continue;
            }
            if let Node::Folder(folder) = child {
                folder.walk_from(&path, visitor);
            }
        }
    }

    /// Folders below this one: direct children for `*`, the whole subtree
    /// (pre-order) for `**`. Each is paired with its path relative to `self`.
    pub fn folders_in_scope(&self, scope: Scope) -> Vec<(LogicalPath, &Folder)> {
        let mut out = Vec::new();
        match scope {
            Scope::Direct => {
                for folder in self.folders() {
                    out.push((LogicalPath::root().join(&folder.name), folder));
                }
            }
            Scope::Recursive => collect_folders(self, &LogicalPath::root(), &mut out),
        }
        out
    }

    // ── counting ────────────────────────────────────────────────────────────

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn folder_count(&self) -> usize {
        self.folders().count()
    }

    /// Direct files whose name ends with `ext`.
    pub fn file_count_with_ext(&self, ext: &str) -> usize {
        self.files().filter(|f| f.name.ends_with(ext)).count()
    }

    /// Files in the whole subtree, optionally filtered by suffix.
    pub fn file_count_recursive(&self, ext: Option<&str>) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::File(f) => usize::from(ext.is_none_or(|e| f.name.ends_with(e))),
                Node::Folder(folder) => folder.file_count_recursive(ext),
            })
            .sum()
    }

    pub fn folder_count_recursive(&self) -> usize {
        self.folders()
            .map(|folder| 1 + folder.folder_count_recursive())
            .sum()
    }

    /// Deepest folder nesting below this folder; a direct subfolder is depth 1.
    pub fn max_depth(&self) -> usize {
        self.folders()
            .map(|folder| 1 + folder.max_depth())
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes below this folder.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| {
            count += 1;
            Walk::Continue
        });
        count
    }

    // ── ordering ────────────────────────────────────────────────────────────

    /// Sort recursively: folders before files, then by name.
    pub fn canonicalize(&mut self) {
        self.children
            .sort_by(|a, b| (a.kind(), a.name()).cmp(&(b.kind(), b.name())));
        for child in &mut self.children {
            if let Node::Folder(folder) = child {
                folder.canonicalize();
            }
        }
    }

    /// Canonically sorted copy.
    pub fn canonical(&self) -> Self {
        let mut copy = self.clone();
        copy.canonicalize();
        copy
    }

    /// Order-insensitive structural equality.
    pub fn same_shape(&self, other: &Folder) -> bool {
        self.canonical().children == other.canonical().children
    }
}

fn collect_folders<'a>(
    folder: &'a Folder,
    base: &LogicalPath,
    out: &mut Vec<(LogicalPath, &'a Folder)>,
) {
    for child in folder.folders() {
        let path = base.join(&child.name);
        out.push((path.clone(), child));
        collect_folders(child, &path, out);
    }
}
