//! The unit of persistence: a declared tree plus its constraints.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    common::LogicalPath,
    constraints::Constraint,
    dsl,
    entities::node::{Folder, Node, NodeKind, ROOT_NAME},
    error::DomainError,
    validation::ConstraintValidator,
};

/// How [`Structure::add`] treats an existing same-kind node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Replace the existing node with a fresh, empty one.
    pub force: bool,
    /// Leave the existing node alone and succeed.
    pub if_not_exists: bool,
}

/// What [`Structure::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    Replaced,
    AlreadyExists,
}

/// A parsed `structure.sr`.
///
/// `raw_constraints` holds the constraint lines exactly as written and is
/// what gets serialized; `constraints` is the compiled form of the same
/// lines. The two are always derived together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub root: Folder,
    #[serde(default)]
    pub raw_constraints: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Default for Structure {
    fn default() -> Self {
        Self::new(Folder::root())
    }
}

impl Structure {
    /// A structure with no constraints.
    pub fn new(root: Folder) -> Self {
        Self {
            root,
            raw_constraints: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, DomainError> {
        dsl::parse(text)
    }

    /// Canonical `structure.sr` text.
    pub fn to_sr(&self) -> String {
        dsl::serialize(self)
    }

    /// Run every constraint against the tree.
    pub fn validate(&self) -> Result<(), DomainError> {
        ConstraintValidator::validate(&self.root, &self.constraints)
    }

    /// Swap in a new tree, keeping the constraints.
    pub fn with_root(&self, mut root: Folder) -> Self {
        root.name = ROOT_NAME.to_string();
        Self {
            root,
            raw_constraints: self.raw_constraints.clone(),
            constraints: self.constraints.clone(),
        }
    }

    pub fn find(&self, path: &LogicalPath) -> Option<&Node> {
        self.root.find(path)
    }

    /// Validate, apply `change` to a copy, re-validate, then commit.
    ///
    /// Nothing is committed if the starting tree is already invalid, if
    /// `change` fails, or if the result violates a constraint.
    pub fn mutate<T, F>(&mut self, change: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Structure) -> Result<T, DomainError>,
    {
        self.validate()?;
        let mut draft = self.clone();
        let out = change(&mut draft)?;
        draft.validate()?;
        *self = draft;
        Ok(out)
    }

    // ── mutation ────────────────────────────────────────────────────────────

    /// Add a node at `path`, creating missing intermediate folders.
    ///
    /// Only a same-kind sibling counts as a clash, matching the parser.
    pub fn add(
        &mut self,
        path: &LogicalPath,
        kind: NodeKind,
        options: AddOptions,
    ) -> Result<AddOutcome, DomainError> {
        let (name, parents) = path.segments().split_last().ok_or_else(|| {
            DomainError::InvalidPath {
                path: path.to_string(),
                reason: "cannot add the root".into(),
            }
        })?;
        for segment in path.segments() {
            check_name(segment)?;
        }

        let mut parent = &mut self.root;
        for segment in parents {
            if parent.subfolder(segment).is_none() {
                debug!(folder = %segment, "creating intermediate folder");
                parent.push(Node::folder(segment.as_str()));
            }
            parent = parent
                .subfolder_mut(segment)
                .ok_or_else(|| DomainError::NodeNotFound {
                    path: path.to_string(),
                })?;
        }

        let existing = parent
            .children
            .iter()
            .position(|c| c.kind() == kind && c.name() == name);

        match existing {
            Some(_) if options.if_not_exists => Ok(AddOutcome::AlreadyExists),
            Some(idx) if options.force => {
                parent.children[idx] = Node::of_kind(kind, name.as_str());
                Ok(AddOutcome::Replaced)
            }
            Some(_) => Err(DomainError::DuplicateNode {
                kind,
                name: name.clone(),
                parent: parent_label(parents),
            }),
            None => {
                parent.push(Node::of_kind(kind, name.as_str()));
                Ok(AddOutcome::Created)
            }
        }
    }

    /// Remove the node at `path` and return it.
    pub fn remove(&mut self, path: &LogicalPath) -> Result<Node, DomainError> {
        let not_found = || DomainError::NodeNotFound {
            path: path.to_string(),
        };
        let name = path.file_name().ok_or_else(|| DomainError::InvalidPath {
            path: path.to_string(),
            reason: "cannot delete the root".into(),
        })?;
        let parent_path = path.parent().unwrap_or_default();
        let parent = self
            .root
            .find_folder_mut(&parent_path)
            .ok_or_else(not_found)?;

        let idx = position_preferring_folder(parent, name).ok_or_else(not_found)?;
        Ok(parent.children.remove(idx))
    }

    /// Rename the node at `path` in place.
    pub fn rename(&mut self, path: &LogicalPath, new_name: &str) -> Result<(), DomainError> {
        let new_name = new_name.trim();
        check_name(new_name)?;

        let not_found = || DomainError::NodeNotFound {
            path: path.to_string(),
        };
        let name = path.file_name().ok_or_else(|| DomainError::InvalidPath {
            path: path.to_string(),
            reason: "cannot rename the root".into(),
        })?;
        let parent_path = path.parent().unwrap_or_default();
        let parent = self
            .root
            .find_folder_mut(&parent_path)
            .ok_or_else(not_found)?;

        let idx = position_preferring_folder(parent, name).ok_or_else(not_found)?;
        let kind = parent.children[idx].kind();
        if name != new_name && parent.has_child_of_kind(new_name, kind) {
            return Err(DomainError::DuplicateNode {
                kind,
                name: new_name.to_string(),
                parent: parent_label(parent_path.segments()),
            });
        }
        parent.children[idx].set_name(new_name.to_string());
        Ok(())
    }
}

fn position_preferring_folder(parent: &Folder, name: &str) -> Option<usize> {
    let by_kind = |kind: NodeKind| {
        parent
            .children
            .iter()
            .position(|c| c.kind() == kind && c.name() == name)
    };
    by_kind(NodeKind::Folder).or_else(|| by_kind(NodeKind::File))
}

fn parent_label(segments: &[String]) -> String {
    if segments.is_empty() {
        "root".to_string()
    } else {
        segments.join("/")
    }
}

/// Reject names that cannot be a single path component.
/// Why `name` cannot be used for a node, if it can't.
pub(crate) fn name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("name cannot be empty")
    } else if name == ROOT_NAME {
        Some("name is reserved")
    } else if name == "." || name == ".." {
        Some("relative components are not allowed")
    } else if name.contains('/') || name.contains('\\') {
        Some("name cannot contain a path separator")
    } else {
        None
    }
}

pub(crate) fn check_name(name: &str) -> Result<(), DomainError> {
    match name_problem(name) {
        Some(reason) => Err(DomainError::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Structure {
        Structure::parse(
            "folder src {\n  file index.ts\n}\nfile README.md\nconstraints {\n  require src/index.ts\n}\n",
        )
        .unwrap()
    }

    #[test]
    fn add_creates_intermediate_folders() {
        let mut s = Structure::default();
        let outcome = s
            .add(&"a/b/c.txt".into(), NodeKind::File, AddOptions::default())
            .unwrap();
        assert_eq!(outcome, AddOutcome::Created);
        assert!(s.find(&"a/b".into()).unwrap().is_folder());
        assert!(s.find(&"a/b/c.txt".into()).unwrap().is_file());
    }

    #[test]
    fn add_duplicate_respects_options() {
        let mut s = sample();
        let path = LogicalPath::parse("src");
        let err = s.add(&path, NodeKind::Folder, AddOptions::default()).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateNode { .. }));

        let skip = AddOptions {
            if_not_exists: true,
            ..Default::default()
        };
        assert_eq!(
            s.add(&path, NodeKind::Folder, skip).unwrap(),
            AddOutcome::AlreadyExists
        );
        assert!(s.find(&"src/index.ts".into()).is_some());

        let force = AddOptions {
            force: true,
            ..Default::default()
        };
        assert_eq!(
            s.add(&path, NodeKind::Folder, force).unwrap(),
            AddOutcome::Replaced
        );
        assert!(s.find(&"src/index.ts".into()).is_none());
    }

    #[test]
    fn add_allows_other_kind_with_same_name() {
        let mut s = sample();
        s.add(&"src".into(), NodeKind::File, AddOptions::default())
            .unwrap();
        assert_eq!(s.root.children.iter().filter(|c| c.name() == "src").count(), 2);
    }

    #[test]
    fn add_rejects_reserved_names() {
        let mut s = Structure::default();
        let err = s
            .add(&"__root__/x".into(), NodeKind::File, AddOptions::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidName { .. }));
        assert!(s.add(&"".into(), NodeKind::File, AddOptions::default()).is_err());
    }

    #[test]
    fn remove_and_missing_paths() {
        let mut s = sample();
        let removed = s.remove(&"README.md".into()).unwrap();
        assert_eq!(removed.name(), "README.md");
        assert!(matches!(
            s.remove(&"README.md".into()),
            Err(DomainError::NodeNotFound { .. })
        ));
        assert!(matches!(
            s.remove(&"nope/x".into()),
            Err(DomainError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn rename_checks_siblings() {
        let mut s = sample();
        s.add(&"src/main.ts".into(), NodeKind::File, AddOptions::default())
            .unwrap();
        assert!(matches!(
            s.rename(&"src/main.ts".into(), "index.ts"),
            Err(DomainError::DuplicateNode { .. })
        ));
        assert!(matches!(
            s.rename(&"src/main.ts".into(), "  "),
            Err(DomainError::InvalidName { .. })
        ));
        s.rename(&"src".into(), "lib").unwrap();
        assert!(s.find(&"lib/index.ts".into()).is_some());
    }

    #[test]
    fn mutate_rolls_back_on_violation() {
        let mut s = sample();
        let before = s.clone();
        let err = s
            .mutate(|draft| draft.remove(&"src/index.ts".into()).map(|_| ()))
            .unwrap_err();
        match err {
            DomainError::ConstraintViolation { keyword, path, .. } => {
                assert_eq!(keyword, "require");
                assert_eq!(path, "src/index.ts");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s, before);
    }

    #[test]
    fn mutate_commits_valid_changes() {
        let mut s = sample();
        s.mutate(|draft| {
            draft
                .add(&"src/util.ts".into(), NodeKind::File, AddOptions::default())
                .map(|_| ())
        })
        .unwrap();
        assert!(s.find(&"src/util.ts".into()).is_some());
    }
}
