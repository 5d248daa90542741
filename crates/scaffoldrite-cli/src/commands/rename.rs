//! `scaffoldrite rename`: rename a node in place.

use scaffoldrite_core::{application::ports::HistoryOperation, domain::LogicalPath};
use tracing::instrument;

use super::{Change, commit, layout, load_structure};
use crate::{
    cli::{GlobalArgs, RenameArgs, ReportArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(path = %args.path))]
pub fn execute(
    args: RenameArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    if args.new_name.contains('/') || args.new_name.contains('\\') {
        return Err(CliError::invalid_input(format!(
            "'{}' is a path; rename takes a new basename",
            args.new_name
        )));
    }

    let layout = layout(global);
    let mut structure = load_structure(&layout)?;
    let before = structure.to_sr();

    let path = LogicalPath::parse(&args.path);
    let new_name = args.new_name.trim().to_string();
    structure.mutate(|s| s.rename(&path, &new_name))?;
    let renamed = path
        .parent()
        .unwrap_or_default()
        .join(new_name.as_str());

    commit(
        &layout,
        config,
        output,
        Change {
            command: "rename",
            before,
            structure: &structure,
            operation: HistoryOperation::Rename {
                from: path.to_string(),
                to: renamed.to_string(),
            },
            apply: args.apply,
            report: ReportArgs::default(),
            moved: Some((path.clone(), renamed.clone())),
        },
    )?;
    if !args.apply.dry_run {
        output.success(&format!("Renamed {path} to {renamed}"))?;
    }
    Ok(())
}
