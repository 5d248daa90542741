//! `scaffoldrite list`: print the declared tree, the directory, or a diff.

use scaffoldrite_adapters::LocalFilesystem;
use scaffoldrite_core::{
    application::FsImporter,
    domain::{Folder, TreeDiff, TreeStyle, diff, filter_ignored, render_tree},
};
use serde::Serialize;
use tracing::instrument;

use super::{ignore_list, layout, load_structure};
use crate::{
    cli::{GlobalArgs, ListArgs, ListSource, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: ListArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    let ignore = ignore_list(&layout, config)?;
    let style = if args.with_icon {
        TreeStyle::Icons
    } else {
        TreeStyle::Plain
    };
    let json = output.format() == OutputFormat::Json;
    let import = || {
        FsImporter::new(Box::new(LocalFilesystem::new())).import(layout.base(), &ignore)
    };

    match args.resolved_source() {
        ListSource::Structure => {
            let structure = load_structure(&layout)?;
            let tree = filter_ignored(&structure.root, &ignore);
            print_tree(output, &tree, style, json)
        }
        ListSource::Fs => print_tree(output, &import()?, style, json),
        ListSource::Diff => {
            let structure = load_structure(&layout)?;
            let changes = diff(&structure.root, &import()?, &ignore);
            if json {
                return print_json(output, &changes);
            }
            output.data(&render_diff(&changes))?;
            Ok(())
        }
    }
}

fn print_tree(
    output: &OutputManager,
    tree: &Folder,
    style: TreeStyle,
    json: bool,
) -> CliResult<()> {
    if json {
        return print_json(output, tree);
    }
    if tree.is_empty() {
        output.info("(empty)")?;
        return Ok(());
    }
    output.data(&render_tree(tree, style))?;
    Ok(())
}

fn print_json<T: Serialize>(output: &OutputManager, value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::invalid_input(format!("cannot encode JSON: {e}")))?;
    output.data(&text)?;
    Ok(())
}

/// `- missing`, `+ extra`, `~ kind changed`, one per line.
fn render_diff(changes: &TreeDiff) -> String {
    if changes.is_empty() {
        return "No differences\n".into();
    }
    let mut out = String::new();
    for entry in &changes.missing {
        out.push_str(&format!("- {} ({})\n", entry.path, entry.kind));
    }
    for entry in &changes.extra {
        out.push_str(&format!("+ {} ({})\n", entry.path, entry.kind));
    }
    for (path, declared, actual) in &changes.kind_changed {
        out.push_str(&format!("~ {path} ({declared} -> {actual})\n"));
    }
    out
}
