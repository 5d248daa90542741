//! `scaffoldrite config`: inspect and create the configuration file.

use std::path::Path;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let path = global.config.clone().unwrap_or_else(AppConfig::config_path);

    match cmd {
        ConfigCommands::Path => {
            output.data(&path.display().to_string())?;
        }

        ConfigCommands::List => {
            output.data(&render(config)?)?;
        }

        ConfigCommands::Init { force } => init(&path, force, output)?,
    }

    Ok(())
}

fn render(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).with_cli_context(|| "Failed to serialise config")
}

/// Write the built-in defaults to `path`.
fn init(path: &Path, force: bool, output: &OutputManager) -> CliResult<()> {
    if path.exists() && !force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            path.display(),
        ))?;
        return Ok(());
    }

    let toml = render(&AppConfig::default())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;

    output.success(&format!("Configuration created at {}", path.display()))?;
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_defaults_load_back() {
        let text = render(&AppConfig::default()).unwrap();
        assert!(text.contains("[generate]"));
        assert!(text.contains("confirm = true"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, text).unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap(), AppConfig::default());
    }
}
