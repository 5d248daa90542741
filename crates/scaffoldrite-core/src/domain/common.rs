use std::fmt;

use serde::{Deserialize, Serialize};

/// A `/`-separated path inside a declared tree.
///
/// Logical paths never touch the filesystem. Leading, trailing, and repeated
/// separators are dropped, so `"/src//lib/"` and `"src/lib"` are the same
/// path. The empty path denotes the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct LogicalPath(Vec<String>);

impl LogicalPath {
    /// The root path (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a `/`-separated path.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.trim()
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Everything but the last segment.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parent)| Self(parent.to_vec()))
    }

    /// Append one segment.
    pub fn join(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// Drop a leading segment equal to `name`.
    ///
    /// Constraint paths may spell out the root folder's own name
    /// (`myapp/src` when the tree was imported from `myapp/`).
    pub fn strip_root_name(&self, name: &str) -> Self {
        match self.0.split_first() {
            Some((first, rest)) if first == name => Self(rest.to_vec()),
            _ => self.clone(),
        }
    }

    /// `true` if `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &LogicalPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl From<&str> for LogicalPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for LogicalPath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<LogicalPath> for String {
    fn from(path: LogicalPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_drops_redundant_separators() {
        let p = LogicalPath::parse(" /src//components/ ");
        assert_eq!(p.segments(), &["src".to_string(), "components".to_string()]);
        assert_eq!(p.to_string(), "src/components");
    }

    #[test]
    fn empty_string_is_root() {
        assert!(LogicalPath::parse("").is_root());
        assert!(LogicalPath::parse("///").is_root());
    }

    #[test]
    fn parent_and_file_name() {
        let p = LogicalPath::parse("a/b/c.txt");
        assert_eq!(p.file_name(), Some("c.txt"));
        assert_eq!(p.parent().unwrap().to_string(), "a/b");
        assert!(LogicalPath::root().parent().is_none());
    }

    #[test]
    fn strip_root_name_only_strips_first_segment() {
        let p = LogicalPath::parse("app/src/app");
        assert_eq!(p.strip_root_name("app").to_string(), "src/app");
        assert_eq!(p.strip_root_name("src").to_string(), "app/src/app");
    }

    #[test]
    fn starts_with_is_segment_wise() {
        let a = LogicalPath::parse("src/lib");
        assert!(a.starts_with(&LogicalPath::parse("src")));
        assert!(!LogicalPath::parse("srcx/lib").starts_with(&LogicalPath::parse("src")));
    }
}
