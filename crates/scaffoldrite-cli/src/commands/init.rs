//! `scaffoldrite init`: create `.scaffoldrite/structure.sr`.

use scaffoldrite_adapters::LocalFilesystem;
use scaffoldrite_core::{
    application::FsImporter,
    domain::{IgnoreList, Structure},
};
use tracing::{info, instrument};

use super::{ignore_list, layout};
use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Starter structure written by a bare `init`.
pub const DEFAULT_TEMPLATE: &str = "\
folder src {
  file index.ts
}
file README.md

constraints {
  require src/index.ts
  require README.md
}
";

#[instrument(skip_all)]
pub fn execute(
    args: InitArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let layout = layout(global);
    if layout.is_initialized() && !args.force {
        return Err(CliError::AlreadyInitialized {
            path: layout.base().to_path_buf(),
        });
    }

    let structure = if args.empty {
        Structure::default()
    } else if let Some(dir) = &args.from_fs {
        let dir = dir.clone().unwrap_or_else(|| layout.base().to_path_buf());
        output.info(&format!("Importing {}", dir.display()))?;
        let ignore = ignore_list(&layout, config)?;
        let root = FsImporter::new(Box::new(LocalFilesystem::new())).import(&dir, &ignore)?;
        Structure::default().with_root(root)
    } else {
        Structure::parse(DEFAULT_TEMPLATE)?
    };

    layout.save_structure(&structure)?;
    info!(nodes = structure.root.node_count(), "structure written");

    if !layout.ignore_path().exists() {
        layout.write_ignore_file(&IgnoreList::defaults())?;
        output.detail(&format!("wrote {}", layout.ignore_path().display()))?;
    }

    output.success(&format!(
        "Initialized {}",
        layout.structure_path().display()
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_is_valid() {
        let structure = Structure::parse(DEFAULT_TEMPLATE).unwrap();
        structure.validate().unwrap();
        assert_eq!(structure.raw_constraints.len(), 2);
    }
}
