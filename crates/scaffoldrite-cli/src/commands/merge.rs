//! `scaffoldrite merge`: additive merge of an import into the declared tree.

use scaffoldrite_adapters::LocalFilesystem;
use scaffoldrite_core::{application::FsImporter, domain::merge};
use tracing::instrument;

use super::{ignore_list, layout, load_structure};
use crate::{
    cli::{GlobalArgs, SyncArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::confirm,
};

#[instrument(skip_all)]
pub fn execute(
    args: SyncArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    let mut structure = load_structure(&layout)?;
    let dir = args.dir.unwrap_or_else(|| layout.base().to_path_buf());
    let ignore = ignore_list(&layout, config)?;

    let imported = FsImporter::new(Box::new(LocalFilesystem::new())).import(&dir, &ignore)?;
    let before = structure.root.node_count();
    merge(&mut structure.root, &imported);
    let added = structure.root.node_count() - before;

    if added == 0 {
        output.info("Nothing to merge")?;
        return Ok(());
    }
    if let Err(e) = structure.validate() {
        output.warning(&format!("Merged tree violates a constraint: {e}"))?;
    }
    if !confirm(&format!("Add {added} entries to structure.sr?"), args.yes)? {
        return Err(CliError::Cancelled);
    }

    layout.save_structure(&structure)?;
    output.success(&format!("Merged {added} entries from {}", dir.display()))?;
    Ok(())
}
