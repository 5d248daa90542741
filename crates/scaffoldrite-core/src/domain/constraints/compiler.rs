//! Raw constraint lines to typed [`Constraint`]s.

use crate::domain::{
    common::LogicalPath,
    constraints::{Constraint, ConstraintKind, Pattern},
    error::DomainError,
    value_objects::Scope,
};

/// Split a line on whitespace, keeping quoted runs together.
///
/// A run opened by `'` closes only at the next `'` (likewise for `"`), so a
/// double-quoted argument may contain a single quote. The quotes themselves
/// are dropped.
pub fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut open: Option<char> = None;
    let mut quoted = false;

    for ch in line.chars() {
        match open {
            Some(q) if ch == q => open = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                open = Some(ch);
                quoted = true;
            }
            None if ch.is_whitespace() => {
                if !current.is_empty() || quoted {
                    args.push(std::mem::take(&mut current));
                    quoted = false;
                }
            }
            None => current.push(ch),
        }
    }
    if !current.is_empty() || quoted {
        args.push(current);
    }
    args
}

/// Compile every non-blank line; the first failure aborts.
///
/// Errors carry the 1-based index of the offending line within `lines`.
pub fn compile_constraints(lines: &[String]) -> Result<Vec<Constraint>, DomainError> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, text)| compile_line(idx + 1, text).transpose())
        .collect()
}

/// Compile one line, reporting errors against `line_no`.
///
/// Blank lines compile to `None`.
pub(crate) fn compile_line(line_no: usize, text: &str) -> Result<Option<Constraint>, DomainError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let fail = |reason: String| DomainError::Compile {
        line: line_no,
        text: text.to_string(),
        reason,
    };

    let keyword = text.split_whitespace().next().unwrap_or_default();
    let kind: ConstraintKind = keyword
        .parse()
        .map_err(|_| fail(format!("unknown constraint '{keyword}'")))?;

    let tokens = split_args(text);
    let args = tokens.get(1..).unwrap_or_default();
    let arity_error = || fail(format!("usage: {}", usage(kind)));

    let count = |raw: &str| -> Result<usize, DomainError> {
        raw.parse::<usize>()
            .map_err(|_| fail(format!("'{raw}' is not a non-negative number")))
    };

    let constraint = match kind {
        // require/forbid take the rest of the line so paths may contain spaces.
        ConstraintKind::Require | ConstraintKind::Forbid => {
            let rest = unquote(text[keyword.len()..].trim());
            if rest.is_empty() {
                return Err(arity_error());
            }
            let path = LogicalPath::parse(rest);
            if kind == ConstraintKind::Require {
                Constraint::Require { path }
            } else {
                Constraint::Forbid { path }
            }
        }

        ConstraintKind::MaxFiles
        | ConstraintKind::MinFiles
        | ConstraintKind::MaxFolders
        | ConstraintKind::MinFolders
        | ConstraintKind::MaxFilesRecursive
        | ConstraintKind::MaxFoldersRecursive
        | ConstraintKind::MaxDepth => {
            let [value, path] = args else {
                return Err(arity_error());
            };
            let value = count(value)?;
            let path = LogicalPath::parse(path);
            match kind {
                ConstraintKind::MaxFiles => Constraint::MaxFiles { path, value },
                ConstraintKind::MinFiles => Constraint::MinFiles { path, value },
                ConstraintKind::MaxFolders => Constraint::MaxFolders { path, value },
                ConstraintKind::MinFolders => Constraint::MinFolders { path, value },
                ConstraintKind::MaxFilesRecursive => Constraint::MaxFilesRecursive { path, value },
                ConstraintKind::MaxFoldersRecursive => {
                    Constraint::MaxFoldersRecursive { path, value }
                }
                _ => Constraint::MaxDepth { path, value },
            }
        }

        ConstraintKind::MaxFilesByExt | ConstraintKind::MaxFilesByExtRecursive => {
            let [ext, value, path] = args else {
                return Err(arity_error());
            };
            let value = count(value)?;
            let path = LogicalPath::parse(path);
            let ext = ext.clone();
            if kind == ConstraintKind::MaxFilesByExt {
                Constraint::MaxFilesByExt { path, ext, value }
            } else {
                Constraint::MaxFilesByExtRecursive { path, ext, value }
            }
        }

        ConstraintKind::MustContain | ConstraintKind::MustHaveFile => {
            let [path, value] = args else {
                return Err(arity_error());
            };
            let path = LogicalPath::parse(path);
            let value = value.clone();
            if kind == ConstraintKind::MustContain {
                Constraint::MustContain { path, value }
            } else {
                Constraint::MustHaveFile { path, value }
            }
        }

        ConstraintKind::FileNameRegex => {
            let [path, regex] = args else {
                return Err(arity_error());
            };
            let regex = Pattern::new(regex).map_err(|e| fail(format!("invalid regex: {e}")))?;
            Constraint::FileNameRegex {
                path: LogicalPath::parse(path),
                regex,
            }
        }

        ConstraintKind::EachFolderMustContain
        | ConstraintKind::EachFolderMustContainFile
        | ConstraintKind::EachFolderMustContainFolder
        | ConstraintKind::EachFolderMustHaveExt => {
            let (scope, path, value) = match args {
                [scope, value] => (scope, LogicalPath::root(), value.clone()),
                [scope, path, value] => (scope, LogicalPath::parse(path), value.clone()),
                _ => return Err(arity_error()),
            };
            let scope: Scope = scope
                .parse()
                .map_err(|_| fail(format!("invalid scope '{scope}' (expected * or **)")))?;
            match kind {
                ConstraintKind::EachFolderMustContain => {
                    Constraint::EachFolderMustContain { scope, path, value }
                }
                ConstraintKind::EachFolderMustContainFile => {
                    Constraint::EachFolderMustContainFile { scope, path, value }
                }
                ConstraintKind::EachFolderMustContainFolder => {
                    Constraint::EachFolderMustContainFolder { scope, path, value }
                }
                _ => Constraint::EachFolderMustHaveExt {
                    scope,
                    path,
                    ext: value,
                },
            }
        }
    };

    Ok(Some(constraint))
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}

fn usage(kind: ConstraintKind) -> String {
    let args = match kind {
        ConstraintKind::Require | ConstraintKind::Forbid => "<path>",
        ConstraintKind::MaxFiles
        | ConstraintKind::MinFiles
        | ConstraintKind::MaxFolders
        | ConstraintKind::MinFolders
        | ConstraintKind::MaxFilesRecursive
        | ConstraintKind::MaxFoldersRecursive => "<count> <path>",
        ConstraintKind::MaxDepth => "<depth> <path>",
        ConstraintKind::MaxFilesByExt | ConstraintKind::MaxFilesByExtRecursive => {
            "<ext> <count> <path>"
        }
        ConstraintKind::MustContain | ConstraintKind::MustHaveFile => "<path> <name>",
        ConstraintKind::FileNameRegex => "<path> <regex>",
        ConstraintKind::EachFolderMustHaveExt => "<*|**> [path] <ext>",
        ConstraintKind::EachFolderMustContain
        | ConstraintKind::EachFolderMustContainFile
        | ConstraintKind::EachFolderMustContainFolder => "<*|**> [path] <name>",
    };
    format!("{kind} {args}")
}
