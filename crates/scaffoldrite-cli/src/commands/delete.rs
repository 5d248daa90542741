//! `scaffoldrite delete`: remove a file or folder.

use scaffoldrite_core::{application::ports::HistoryOperation, domain::LogicalPath};
use tracing::instrument;

use super::{Change, commit, layout, load_structure};
use crate::{
    cli::{DeleteArgs, GlobalArgs, ReportArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(path = %args.path))]
pub fn execute(
    args: DeleteArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    let mut structure = load_structure(&layout)?;
    let before = structure.to_sr();

    let path = LogicalPath::parse(&args.path);
    let removed = structure.mutate(|s| s.remove(&path))?;

    commit(
        &layout,
        config,
        output,
        Change {
            command: "delete",
            before,
            structure: &structure,
            operation: HistoryOperation::Delete {
                path: path.to_string(),
            },
            apply: args.apply,
            report: ReportArgs::default(),
            moved: None,
        },
    )?;
    if !args.apply.dry_run {
        output.success(&format!("Deleted {} {path}", removed.kind()))?;
    }
    Ok(())
}
