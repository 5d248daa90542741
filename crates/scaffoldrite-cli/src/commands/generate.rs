//! `scaffoldrite generate`: sync a directory to `structure.sr`.

use std::path::Path;

use scaffoldrite_adapters::{LocalFilesystem, ProjectLayout};
use scaffoldrite_core::{
    application::{ReconcileService, ports::Filesystem},
    domain::{CONFIG_DIR, Structure},
};
use tracing::{debug, instrument};

use super::{ignore_list, layout, load_structure, print_report, reconcile, reconcile_options};
use crate::{
    cli::{GenerateArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    prompt::confirm,
};

#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    let structure = load_structure(&layout)?;
    structure.validate()?;

    let target = args.dir.clone().unwrap_or_else(|| layout.base().to_path_buf());
    let elsewhere = target != layout.base();
    let dry_run = args.apply.dry_run;

    let mut options = reconcile_options(ignore_list(&layout, config)?, dry_run);
    if elsewhere && (args.copy || config.generate.copy_contents) {
        options.copy_from = Some(layout.base().to_path_buf());
    }

    let plan = ReconcileService::new(Box::new(LocalFilesystem::new())).plan(
        &structure.root,
        &target,
        &options,
    )?;
    let changes = plan.iter().filter(|op| op.kind.is_change()).count();
    debug!(changes, "planned");

    let ask = !dry_run && changes > 0 && config.generate.confirm;
    if ask
        && !confirm(
            &format!("Apply {changes} changes to {}?", target.display()),
            args.apply.yes,
        )?
    {
        return Err(CliError::Cancelled);
    }

    let report = reconcile(&structure, &target, &options, output)?;

    if elsewhere && !dry_run {
        sync_tooling(&layout, &structure, &target, args.ignore_tooling)?;
    }

    print_report(output, &report, args.report, dry_run)?;
    Ok(())
}

/// Copy `.scaffoldrite/` config into `target`, or remove it there.
fn sync_tooling(
    source: &ProjectLayout,
    structure: &Structure,
    target: &Path,
    ignore_tooling: bool,
) -> CliResult<()> {
    let fs = LocalFilesystem::new();
    let config_dir = target.join(CONFIG_DIR);
    if ignore_tooling {
        if fs.exists(&config_dir) {
            fs.remove_dir_all(&config_dir)?;
            debug!(path = %config_dir.display(), "removed tooling");
        }
        return Ok(());
    }

    let out = ProjectLayout::new(target);
    out.save_structure(structure)?;
    if fs.exists(&source.ignore_path()) {
        fs.copy_file(&source.ignore_path(), &out.ignore_path())?;
    }
    debug!(path = %config_dir.display(), "copied tooling");
    Ok(())
}
