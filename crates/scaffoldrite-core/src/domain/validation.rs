use crate::domain::{
    common::LogicalPath,
    constraints::Constraint,
    entities::node::Folder,
    error::DomainError,
    value_objects::Scope,
};

/// Evaluates compiled constraints against a tree.
///
/// Evaluation is fail-fast: the first violated constraint is returned and
/// nothing after it is checked. A `require` whose path does not resolve is a
/// violation; every count or content constraint whose target does not
/// resolve to a folder is skipped.
pub struct ConstraintValidator;

impl ConstraintValidator {
    pub fn validate(root: &Folder, constraints: &[Constraint]) -> Result<(), DomainError> {
        constraints
            .iter()
            .try_for_each(|constraint| Self::check(root, constraint))
    }

    /// Evaluate a single constraint.
    pub fn check(root: &Folder, constraint: &Constraint) -> Result<(), DomainError> {
        let keyword = constraint.kind().as_str();
        let target = resolve_path(root, constraint.path());
        let shown = constraint.path().to_string();
        let violation = |detail: String| -> Result<(), DomainError> {
            Err(DomainError::violation(keyword, &shown, detail))
        };

        match constraint {
            Constraint::Require { .. } => {
                if !root.contains_path(&target) {
                    return violation("required path not found".into());
                }
                Ok(())
            }
            Constraint::Forbid { .. } => {
                if root.contains_path(&target) {
                    return violation("forbidden path exists".into());
                }
                Ok(())
            }
            _ => {
                let Some(folder) = root.find_folder(&target) else {
                    return Ok(());
                };
                Self::check_folder(folder, &target, constraint)
                    .map_err(|detail| DomainError::violation(keyword, detail.0, detail.1))
            }
        }
    }

    /// Checks for constraints that inspect a resolved folder.
    ///
    /// Errors carry the offending logical path and a detail message.
    fn check_folder(
        folder: &Folder,
        at: &LogicalPath,
        constraint: &Constraint,
    ) -> Result<(), (String, String)> {
        let here = || at.to_string();
        let over = |what: &str, actual: usize, max: usize| {
            if actual > max {
                Err((here(), format!("has {actual} {what} (max allowed {max})")))
            } else {
                Ok(())
            }
        };
        let under = |what: &str, actual: usize, min: usize| {
            if actual < min {
                Err((here(), format!("has {actual} {what} (min required {min})")))
            } else {
                Ok(())
            }
        };

        match constraint {
            Constraint::MaxFiles { value, .. } => over("files", folder.file_count(), *value),
            Constraint::MinFiles { value, .. } => under("files", folder.file_count(), *value),
            Constraint::MaxFolders { value, .. } => over("folders", folder.folder_count(), *value),
            Constraint::MinFolders { value, .. } => {
                under("folders", folder.folder_count(), *value)
            }
            Constraint::MaxFilesByExt { ext, value, .. } => over(
                &format!("files with extension \"{ext}\""),
                folder.file_count_with_ext(ext),
                *value,
            ),
            Constraint::MaxFilesRecursive { value, .. } => over(
                "files recursively",
                folder.file_count_recursive(None),
                *value,
            ),
            Constraint::MaxFoldersRecursive { value, .. } => over(
                "folders recursively",
                folder.folder_count_recursive(),
                *value,
            ),
            Constraint::MaxFilesByExtRecursive { ext, value, .. } => over(
                &format!("files with extension \"{ext}\" recursively"),
                folder.file_count_recursive(Some(ext)),
                *value,
            ),
            Constraint::MustContain { value, .. } => {
                if folder.has_child(value) {
                    Ok(())
                } else {
                    Err((here(), format!("must contain \"{value}\"")))
                }
            }
            Constraint::MustHaveFile { value, .. } => {
                if folder.files().any(|f| &f.name == value) {
                    Ok(())
                } else {
                    Err((here(), format!("must have file \"{value}\"")))
                }
            }
            Constraint::FileNameRegex { regex, .. } => {
                match folder.files().find(|f| !regex.is_match(&f.name)) {
                    Some(file) => Err((
                        at.join(&file.name).to_string(),
                        format!("file name does not match regex \"{regex}\""),
                    )),
                    None => Ok(()),
                }
            }
            Constraint::MaxDepth { value, .. } => {
                let depth = folder.max_depth();
                if depth > *value {
                    Err((
                        here(),
                        format!("exceeds max depth of {value} (current depth {depth})"),
                    ))
                } else {
                    Ok(())
                }
            }
            Constraint::EachFolderMustContain { scope, value, .. } => {
                each_folder(folder, at, *scope, |f| {
                    f.has_child(value)
                        .then_some(())
                        .ok_or_else(|| format!("must contain \"{value}\""))
                })
            }
            Constraint::EachFolderMustContainFile { scope, value, .. } => {
                each_folder(folder, at, *scope, |f| {
                    f.files()
                        .any(|file| &file.name == value)
                        .then_some(())
                        .ok_or_else(|| format!("must contain file \"{value}\""))
                })
            }
            Constraint::EachFolderMustContainFolder { scope, value, .. } => {
                each_folder(folder, at, *scope, |f| {
                    f.subfolder(value)
                        .map(|_| ())
                        .ok_or_else(|| format!("must contain folder \"{value}\""))
                })
            }
            Constraint::EachFolderMustHaveExt { scope, ext, .. } => {
                each_folder(folder, at, *scope, |f| {
                    (f.file_count_with_ext(ext) > 0)
                        .then_some(())
                        .ok_or_else(|| format!("must contain a file with extension \"{ext}\""))
                })
            }
            Constraint::Require { .. } | Constraint::Forbid { .. } => Ok(()),
        }
    }
}

/// Apply `test` to every folder in scope; the first failure names its folder.
fn each_folder<F>(
    base: &Folder,
    at: &LogicalPath,
    scope: Scope,
    test: F,
) -> Result<(), (String, String)>
where
    F: Fn(&Folder) -> Result<(), String>,
{
    for (relative, folder) in base.folders_in_scope(scope) {
        if let Err(detail) = test(folder) {
            let mut full = at.clone();
            for segment in relative.segments() {
                full = full.join(segment.as_str());
            }
            return Err((full.to_string(), detail));
        }
    }
    Ok(())
}

/// Map a constraint path onto `root`, dropping a leading root-name segment.
fn resolve_path(root: &Folder, path: &LogicalPath) -> LogicalPath {
    path.strip_root_name(&root.name)
}
