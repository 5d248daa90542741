use tracing::{debug, instrument};

use crate::domain::{
    constraints::compiler::compile_line,
    dsl::strip_comment,
    entities::{
        node::{Folder, Node, NodeKind},
        structure::{Structure, name_problem},
    },
    error::DomainError,
};

/// Parse `structure.sr` text.
///
/// Parsing is all-or-nothing; every error carries the 1-based line it was
/// found on.
#[instrument(skip_all, fields(bytes = input.len()))]
pub fn parse(input: &str) -> Result<Structure, DomainError> {
    let mut parser = Parser::new(input);
    let mut root = Folder::root();
    parser.block(&mut root, None)?;

    debug!(
        nodes = root.node_count(),
        constraints = parser.constraints.len(),
        "parsed structure"
    );

    Ok(Structure {
        root,
        raw_constraints: parser.raw_constraints,
        constraints: parser.constraints,
    })
}

/// A non-blank line with its comment removed.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

enum Statement<'a> {
    Folder(&'a str),
    File(&'a str),
    Close,
    Constraints,
}

struct Parser<'a> {
    lines: std::vec::IntoIter<Line<'a>>,
    raw_constraints: Vec<String>,
    constraints: Vec<crate::domain::constraints::Constraint>,
    seen_constraints: bool,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let lines: Vec<Line<'a>> = input
            .lines()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let text = strip_comment(raw).trim();
                (!text.is_empty()).then_some(Line {
                    number: idx + 1,
                    text,
                })
            })
            .collect();

        Self {
            lines: lines.into_iter(),
            raw_constraints: Vec::new(),
            constraints: Vec::new(),
            seen_constraints: false,
        }
    }

    /// Parse statements into `folder` until its closing brace.
    ///
    /// `opened_at` is the line of the `folder … {` that opened this block,
    /// or `None` for the root.
    fn block(&mut self, folder: &mut Folder, opened_at: Option<usize>) -> Result<(), DomainError> {
        while let Some(line) = self.lines.next() {
            match statement(line)? {
                Statement::Close => {
                    return match opened_at {
                        Some(_) => Ok(()),
                        None => Err(DomainError::parse(line.number, "Unexpected \"}\"")),
                    };
                }
                Statement::Folder(name) => {
                    check_name(name, line.number)?;
                    if folder.has_child_of_kind(name, NodeKind::Folder) {
                        return Err(DomainError::parse(
                            line.number,
                            format!("Duplicate folder name \"{name}\" in the same scope"),
                        ));
                    }
                    let mut child = Folder::new(name);
                    self.block(&mut child, Some(line.number))?;
                    folder.push(Node::Folder(child));
                }
                Statement::File(name) => {
                    check_name(name, line.number)?;
                    if folder.has_child_of_kind(name, NodeKind::File) {
                        return Err(DomainError::parse(
                            line.number,
                            format!("Duplicate file name \"{name}\" in the same scope"),
                        ));
                    }
                    folder.push(Node::file(name));
                }
                Statement::Constraints => {
                    if opened_at.is_some() {
                        return Err(DomainError::parse(
                            line.number,
                            "constraints block must be at the top level",
                        ));
                    }
                    if self.seen_constraints {
                        return Err(DomainError::parse(
                            line.number,
                            "Only one constraints block is allowed",
                        ));
                    }
                    self.seen_constraints = true;
                    self.constraints_block(line.number)?;
                }
            }
        }

        match opened_at {
            Some(number) => Err(DomainError::parse(number, "Unclosed folder block")),
            None => Ok(()),
        }
    }

    /// Capture raw constraint lines until the block's braces balance.
    fn constraints_block(&mut self, opened_at: usize) -> Result<(), DomainError> {
        let mut depth = 1usize;
        for line in self.lines.by_ref() {
            if line.text.contains('{') {
                depth += 1;
            }
            if line.text.contains('}') {
                depth -= 1;
            }
            if depth == 0 {
                return Ok(());
            }
            if let Some(constraint) = compile_line(line.number, line.text)? {
                self.constraints.push(constraint);
            }
            self.raw_constraints.push(line.text.to_string());
        }
        Err(DomainError::parse(opened_at, "Unclosed constraints block"))
    }
}

fn statement(line: Line<'_>) -> Result<Statement<'_>, DomainError> {
    let text = line.text;
    if text == "}" {
        return Ok(Statement::Close);
    }
    if text.strip_prefix("constraints").map(str::trim) == Some("{") {
        return Ok(Statement::Constraints);
    }
    if let Some(rest) = keyword_rest(text, "folder") {
        return rest
            .strip_suffix('{')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Statement::Folder)
            .ok_or_else(|| {
                DomainError::parse(line.number, format!("Invalid folder syntax: \"{text}\""))
            });
    }
    if let Some(rest) = keyword_rest(text, "file") {
        let name = rest.trim();
        if name.is_empty() || name.ends_with('{') {
            return Err(DomainError::parse(
                line.number,
                format!("Invalid file syntax: \"{text}\""),
            ));
        }
        return Ok(Statement::File(name));
    }
    Err(DomainError::parse(
        line.number,
        format!("Unknown statement: \"{text}\""),
    ))
}

/// `text` minus `keyword` when the keyword is followed by whitespace.
fn keyword_rest<'t>(text: &'t str, keyword: &str) -> Option<&'t str> {
    text.strip_prefix(keyword)
        .filter(|rest| rest.starts_with(char::is_whitespace))
}

fn check_name(name: &str, line: usize) -> Result<(), DomainError> {
    match name_problem(name) {
        Some(reason) => Err(DomainError::parse(
            line,
            format!("Invalid name \"{name}\": {reason}"),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constraints::Constraint;

    fn err_line(input: &str) -> (usize, String) {
        match parse(input).unwrap_err() {
            DomainError::Parse { line, message } => (line, message),
            DomainError::Compile { line, reason, .. } => (line, reason),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_nested_tree_in_order() {
        let s = parse("folder src {\n  folder lib {\n    file a.rs\n  }\n  file main.rs\n}\nfile README.md\n")
            .unwrap();
        let src = s.root.subfolder("src").unwrap();
        let names: Vec<_> = src.children.iter().map(Node::name).collect();
        assert_eq!(names, ["lib", "main.rs"]);
        assert!(s.root.find(&"src/lib/a.rs".into()).is_some());
        assert!(s.raw_constraints.is_empty());
    }

    #[test]
    fn captures_raw_and_compiled_constraints() {
        let s = parse(
            "file a\nconstraints {\n  require a\n  // skipped\n  maxFiles 1 \"\"\n}\n",
        )
        .unwrap();
        assert_eq!(s.raw_constraints, ["require a", "maxFiles 1 \"\""]);
        assert_eq!(
            s.constraints[0],
            Constraint::Require { path: "a".into() }
        );
        assert_eq!(s.constraints.len(), 2);
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let s = parse("// header\n\nfolder a { // trailing\n\n  file b // x\n}\n").unwrap();
        assert!(s.root.find(&"a/b".into()).unwrap().is_file());
    }

    #[test]
    fn same_name_file_and_folder_is_allowed() {
        let s = parse("folder x {\n}\nfile x\n").unwrap();
        assert_eq!(s.root.children.len(), 2);
    }

    #[test]
    fn reports_errors_with_line_numbers() {
        let (line, msg) = err_line("folder a {\n}\nfolder a {\n}\n");
        assert_eq!(line, 3);
        assert!(msg.contains("Duplicate folder name"));

        let (line, msg) = err_line("file a\nfile a\n");
        assert_eq!(line, 2);
        assert!(msg.contains("Duplicate file name"));

        let (line, msg) = err_line("file a\n}\n");
        assert_eq!(line, 2);
        assert!(msg.contains("Unexpected"));

        let (line, msg) = err_line("\nfolder a {\n  file b\n");
        assert_eq!(line, 2);
        assert!(msg.contains("Unclosed folder block"));

        let (line, msg) = err_line("folder a\n");
        assert_eq!(line, 1);
        assert!(msg.contains("Invalid folder syntax"));

        let (line, msg) = err_line("file a\nfloder b {\n");
        assert_eq!(line, 2);
        assert!(msg.contains("Unknown statement"));

        let (_, msg) = err_line("file __root__\n");
        assert!(msg.contains("name is reserved"));
    }

    #[test]
    fn relative_and_separator_names_are_rejected() {
        let (line, msg) = err_line("folder .. {\n  file escaped.txt\n}\n");
        assert_eq!(line, 1);
        assert!(msg.contains("relative components"));

        let (line, _) = err_line("folder src {\n  file .\n}\n");
        assert_eq!(line, 2);

        let (_, msg) = err_line("file a\\b.txt\n");
        assert!(msg.contains("path separator"));
    }

    #[test]
    fn constraint_errors_use_file_line_numbers() {
        let (line, msg) = err_line("file a\n\nconstraints {\n  require a\n  maxFiles x a\n}\n");
        assert_eq!(line, 5);
        assert!(msg.contains("not a non-negative number"));
    }

    #[test]
    fn constraints_block_placement() {
        let (_, msg) = err_line("folder a {\n  constraints {\n  }\n}\n");
        assert!(msg.contains("top level"));

        let (_, msg) = err_line("constraints {\n}\nconstraints {\n}\n");
        assert!(msg.contains("Only one"));

        let (line, msg) = err_line("constraints {\n  require a\n");
        assert_eq!(line, 1);
        assert!(msg.contains("Unclosed constraints block"));
    }

    #[test]
    fn names_may_contain_spaces() {
        let s = parse("folder my docs {\n  file read me.md\n}\n").unwrap();
        assert!(s.root.find(&"my docs/read me.md".into()).is_some());
    }
}
