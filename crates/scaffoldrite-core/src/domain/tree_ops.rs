//! Whole-tree operations: additive merge, ignore filtering, and path diff.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    common::LogicalPath,
    entities::node::{Folder, Node, NodeKind, Walk},
    value_objects::IgnoreList,
};

/// Fold `incoming` into `existing` without removing or overwriting anything.
///
/// Folders merge recursively by name; a file is appended only when no file
/// of that name is already present.
pub fn merge(existing: &mut Folder, incoming: &Folder) {
    for child in &incoming.children {
        match child {
            Node::Folder(folder) => match existing.subfolder_mut(&folder.name) {
                Some(target) => merge(target, folder),
                None => existing.push(child.clone()),
            },
            Node::File(file) => {
                if !existing.has_child_of_kind(&file.name, NodeKind::File) {
                    existing.push(child.clone());
                }
            }
        }
    }
}

/// Copy of `folder` with every ignored name pruned, at any depth.
pub fn filter_ignored(folder: &Folder, ignore: &IgnoreList) -> Folder {
    Folder {
        name: folder.name.clone(),
        children: folder
            .children
            .iter()
            .filter(|child| !ignore.contains(child.name()))
            .map(|child| match child {
                Node::Folder(sub) => Node::Folder(filter_ignored(sub, ignore)),
                Node::File(_) => child.clone(),
            })
            .collect(),
    }
}

/// Every non-ignored path below `folder`, with its kind.
pub fn flatten(folder: &Folder, ignore: &IgnoreList) -> BTreeMap<LogicalPath, NodeKind> {
    let mut map = BTreeMap::new();
    folder.walk(&mut |node, path| {
        if ignore.contains(node.name()) {
            return Walk::Prune;
        }
        map.insert(path.clone(), node.kind());
        Walk::Continue
    });
    map
}

/// An entry present on only one side of a diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffEntry {
    pub path: LogicalPath,
    pub kind: NodeKind,
}

/// Result of [`diff`]. Every list is sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TreeDiff {
    /// In the declared tree, not in the actual one.
    pub missing: Vec<DiffEntry>,
    /// In the actual tree, not in the declared one.
    pub extra: Vec<DiffEntry>,
    /// Same path on both sides with a different kind: `(path, declared, actual)`.
    pub kind_changed: Vec<(LogicalPath, NodeKind, NodeKind)>,
}

impl TreeDiff {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.kind_changed.is_empty()
    }
}

/// Compare `declared` against `actual` by path.
pub fn diff(declared: &Folder, actual: &Folder, ignore: &IgnoreList) -> TreeDiff {
    let left = flatten(declared, ignore);
    let right = flatten(actual, ignore);
    let mut out = TreeDiff::default();

    for (path, &kind) in &left {
        match right.get(path) {
            None => out.missing.push(DiffEntry {
                path: path.clone(),
                kind,
            }),
            Some(&other) if other != kind => out.kind_changed.push((path.clone(), kind, other)),
            Some(_) => {}
        }
    }
    for (path, &kind) in &right {
        if !left.contains_key(path) {
            out.extra.push(DiffEntry {
                path: path.clone(),
                kind,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared() -> Folder {
        Folder::root()
            .with_folder(Folder::new("src").with_file("main.rs").with_file("lib.rs"))
            .with_file("README.md")
    }

    #[test]
    fn merge_is_additive() {
        let mut existing = declared();
        let incoming = Folder::new("project")
            .with_folder(
                Folder::new("src")
                    .with_file("main.rs")
                    .with_folder(Folder::new("bin").with_file("cli.rs")),
            )
            .with_file("Cargo.toml");

        let before = flatten(&existing, &IgnoreList::empty());
        merge(&mut existing, &incoming);
        let after = flatten(&existing, &IgnoreList::empty());

        for path in before.keys() {
            assert!(after.contains_key(path), "lost {path}");
        }
        assert!(after.contains_key(&LogicalPath::parse("src/bin/cli.rs")));
        assert!(after.contains_key(&LogicalPath::parse("Cargo.toml")));
        let src = existing.subfolder("src").unwrap();
        assert_eq!(src.files().filter(|f| f.name == "main.rs").count(), 1);
    }

    #[test]
    fn filter_prunes_at_any_depth() {
        let tree = Folder::root().with_folder(
            Folder::new("web")
                .with_folder(Folder::new("node_modules").with_file("pkg.js"))
                .with_file("index.js"),
        );
        let filtered = filter_ignored(&tree, &IgnoreList::defaults());
        assert!(filtered.find(&"web/node_modules".into()).is_none());
        assert!(filtered.find(&"web/index.js".into()).is_some());
    }

    #[test]
    fn diff_of_identical_trees_is_empty() {
        let t = declared();
        assert!(diff(&t, &t, &IgnoreList::empty()).is_empty());
    }

    #[test]
    fn diff_reports_both_sides_sorted() {
        let actual = Folder::root()
            .with_folder(Folder::new("src").with_file("main.rs"))
            .with_folder(Folder::new("README.md"))
            .with_file("zz.txt")
            .with_file("aa.txt");
        let d = diff(&declared(), &actual, &IgnoreList::empty());

        let missing: Vec<_> = d.missing.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(missing, ["src/lib.rs"]);
        let extra: Vec<_> = d.extra.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(extra, ["aa.txt", "zz.txt"]);
        assert_eq!(
            d.kind_changed,
            vec![(LogicalPath::parse("README.md"), NodeKind::File, NodeKind::Folder)]
        );
    }

    #[test]
    fn diff_skips_ignored_subtrees() {
        let actual = declared().with_folder(Folder::new("node_modules").with_file("x.js"));
        assert!(diff(&declared(), &actual, &IgnoreList::defaults()).is_empty());
    }
}
