//! `scaffoldrite validate`: constraints, then the base directory.

use scaffoldrite_adapters::LocalFilesystem;
use scaffoldrite_core::{
    application::{FsValidationOptions, FsValidator},
    domain::IgnoreList,
};
use tracing::instrument;

use super::{ignore_list, layout, load_structure};
use crate::{
    cli::{GlobalArgs, ValidateArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(
    args: ValidateArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    let structure = load_structure(&layout)?;

    structure.validate()?;
    output.success(&format!(
        "{} constraints satisfied",
        structure.constraints.len()
    ))?;

    let options = fs_options(args, ignore_list(&layout, config)?);
    FsValidator::new(Box::new(LocalFilesystem::new())).validate(
        &structure.root,
        layout.base(),
        &options,
    )?;
    output.success("Filesystem matches structure.sr")?;
    Ok(())
}

/// `--allow-extra` alone accepts every extra; with values, only those.
fn fs_options(args: ValidateArgs, ignore: IgnoreList) -> FsValidationOptions {
    match args.allow_extra {
        None => FsValidationOptions {
            ignore,
            ..Default::default()
        },
        Some(paths) => FsValidationOptions {
            ignore,
            allow_extra: paths.is_empty(),
            allow_paths: paths,
        },
    }
}
