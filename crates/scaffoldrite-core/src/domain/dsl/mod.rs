//! The `structure.sr` language.
//!
//! ```text
//! folder src {
//!   folder components {
//!     file Button.tsx
//!   }
//!   file index.ts   // comments run to end of line
//! }
//! file README.md
//!
//! constraints {
//!   require src/index.ts
//!   eachFolderMustContain * src index.ts
//! }
//! ```

mod parser;
mod serializer;

pub use parser::parse;
pub use serializer::{render_tree, serialize, TreeStyle};

/// Cut a trailing `//` comment, leaving `//` inside quotes alone.
pub(crate) fn strip_comment(line: &str) -> &str {
    let mut open: Option<char> = None;
    let mut prev_slash = false;
    for (idx, ch) in line.char_indices() {
        match open {
            Some(q) if ch == q => open = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => open = Some(ch),
            None if ch == '/' && prev_slash => return &line[..idx - 1],
            None => {}
        }
        prev_slash = open.is_none() && ch == '/';
    }
    line
}
