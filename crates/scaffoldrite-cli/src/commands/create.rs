//! `scaffoldrite create`: add a file or folder.

use scaffoldrite_core::{
    application::ports::HistoryOperation,
    domain::{AddOptions, AddOutcome, LogicalPath, NodeKind},
};
use tracing::instrument;

use super::{Change, commit, layout, load_structure};
use crate::{
    cli::{CreateArgs, GlobalArgs, KindArg},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

impl From<KindArg> for NodeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::File => NodeKind::File,
            KindArg::Folder => NodeKind::Folder,
        }
    }
}

#[instrument(skip_all, fields(path = %args.path))]
pub fn execute(
    args: CreateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    let mut structure = load_structure(&layout)?;
    let before = structure.to_sr();

    let path = LogicalPath::parse(&args.path);
    let kind = NodeKind::from(args.kind);
    let options = AddOptions {
        force: args.force,
        if_not_exists: args.if_not_exists,
    };
    let outcome = structure.mutate(|s| s.add(&path, kind, options))?;

    if outcome == AddOutcome::AlreadyExists {
        output.info(&format!("{kind} {path} already exists"))?;
        return Ok(());
    }
    if outcome == AddOutcome::Replaced {
        output.warning(&format!("Replacing {kind} {path}"))?;
    }

    commit(
        &layout,
        config,
        output,
        Change {
            command: "create",
            before,
            structure: &structure,
            operation: HistoryOperation::Create {
                path: path.to_string(),
                kind,
            },
            apply: args.apply,
            report: args.report,
            moved: None,
        },
    )?;
    if !args.apply.dry_run {
        output.success(&format!("Created {kind} {path}"))?;
    }
    Ok(())
}
