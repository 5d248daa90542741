//! `scaffoldrite update`: replace the declared tree with an import.

use scaffoldrite_adapters::LocalFilesystem;
use scaffoldrite_core::application::FsImporter;
use tracing::instrument;

use super::{ignore_list, layout, load_structure};
use crate::{
    cli::{GlobalArgs, SyncArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::confirm,
};

/// Re-import the directory, keeping the constraint block as written.
#[instrument(skip_all)]
pub fn execute(
    args: SyncArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    let current = load_structure(&layout)?;
    let dir = args.dir.unwrap_or_else(|| layout.base().to_path_buf());
    let ignore = ignore_list(&layout, config)?;

    let imported = FsImporter::new(Box::new(LocalFilesystem::new())).import(&dir, &ignore)?;
    let updated = current.with_root(imported);

    // The new tree may not satisfy the old constraints; save anyway.
    if let Err(e) = updated.validate() {
        output.warning(&format!("Imported tree violates a constraint: {e}"))?;
    }
    if updated.root.same_shape(&current.root) {
        output.info("structure.sr already matches the directory")?;
        return Ok(());
    }
    if !confirm("Overwrite structure.sr with the directory contents?", args.yes)? {
        return Err(CliError::Cancelled);
    }

    layout.save_structure(&updated)?;
    output.success(&format!(
        "Updated structure.sr from {} ({} entries)",
        dir.display(),
        updated.root.node_count()
    ))?;
    Ok(())
}
