use crate::domain::entities::{
    node::{Folder, Node},
    structure::Structure,
};

const INDENT: &str = "  ";

/// Render a structure as canonical `structure.sr` text.
///
/// Children are emitted folders first, then by name, at every level. The
/// input is not modified.
pub fn serialize(structure: &Structure) -> String {
    let root = structure.root.canonical();
    let mut out = String::new();
    write_children(&root, 0, &mut out);

    if !structure.raw_constraints.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("constraints {\n");
        for line in &structure.raw_constraints {
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("}\n");
    }
    out
}

fn write_children(folder: &Folder, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    for child in &folder.children {
        match child {
            Node::Folder(sub) => {
                out.push_str(&format!("{pad}folder {} {{\n", sub.name));
                write_children(sub, depth + 1, out);
                out.push_str(&format!("{pad}}}\n"));
            }
            Node::File(file) => out.push_str(&format!("{pad}file {}\n", file.name)),
        }
    }
}

/// How [`render_tree`] marks entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TreeStyle {
    /// Box-drawing branches, folders suffixed with `/`.
    #[default]
    Plain,
    /// Box-drawing branches with folder/file icons.
    Icons,
}

/// Human-readable listing of a tree, one entry per line.
pub fn render_tree(folder: &Folder, style: TreeStyle) -> String {
    let mut out = String::new();
    render_level(folder, "", style, &mut out);
    out
}

fn render_level(folder: &Folder, prefix: &str, style: TreeStyle, out: &mut String) {
    let count = folder.children.len();
    for (idx, child) in folder.children.iter().enumerate() {
        let last = idx + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        let label = match (style, child) {
            (TreeStyle::Plain, Node::Folder(f)) => format!("{}/", f.name),
            (TreeStyle::Plain, Node::File(f)) => f.name.clone(),
            (TreeStyle::Icons, Node::Folder(f)) => format!("📁 {}", f.name),
            (TreeStyle::Icons, Node::File(f)) => format!("📄 {}", f.name),
        };
        out.push_str(prefix);
        out.push_str(branch);
        out.push_str(&label);
        out.push('\n');

        if let Node::Folder(sub) = child {
            let next = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_level(sub, &next, style, out);
        }
    }
}
