//! Command handlers, one module per subcommand.
//!
//! Helpers shared by several handlers live here: loading the project,
//! building ignore lists, running the reconciler, and printing its report.

use std::path::Path;

use scaffoldrite_adapters::{JsonHistoryWriter, LocalFilesystem, ProjectLayout};
use scaffoldrite_core::{
    application::{
        OperationKind, ReconcileOptions, ReconcileReport, ReconcileService,
        ports::{Filesystem, HistoryEntry, HistoryOperation, HistoryWriter, to_native},
    },
    domain::{CONFIG_DIR, IGNORE_FILE, IgnoreList, LogicalPath, Structure},
};
use tracing::{debug, warn};

use crate::{
    cli::{ApplyArgs, GlobalArgs, ReportArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    progress::ProgressBarObserver,
};

pub mod completions;
pub mod config;
pub mod create;
pub mod delete;
pub mod generate;
pub mod init;
pub mod list;
pub mod merge;
pub mod rename;
pub mod update;
pub mod validate;

// ── project ───────────────────────────────────────────────────────────────────

/// Layout for the base directory named by `-C` (or the current directory).
pub(crate) fn layout(global: &GlobalArgs) -> ProjectLayout {
    ProjectLayout::new(global.base_dir())
}

/// Load `structure.sr`, failing with `NotInitialized` when absent.
pub(crate) fn load_structure(layout: &ProjectLayout) -> CliResult<Structure> {
    if !layout.is_initialized() {
        return Err(CliError::NotInitialized {
            path: layout.structure_path(),
        });
    }
    Ok(layout.load_structure()?)
}

/// The project's ignore list plus the configured extras and the tooling
/// entries, which are never part of a declared tree.
pub(crate) fn ignore_list(layout: &ProjectLayout, config: &AppConfig) -> CliResult<IgnoreList> {
    let mut ignore = layout.load_ignore_list()?;
    for name in &config.ignore.defaults {
        ignore.insert(name.as_str());
    }
    ignore.insert(CONFIG_DIR);
    ignore.insert(IGNORE_FILE);
    Ok(ignore)
}

// ── reconcile ─────────────────────────────────────────────────────────────────

/// Sync `output` to the structure, drawing a progress bar while it runs.
pub(crate) fn reconcile(
    structure: &Structure,
    output_dir: &Path,
    options: &ReconcileOptions,
    out: &OutputManager,
) -> CliResult<ReconcileReport> {
    let service = ReconcileService::new(Box::new(LocalFilesystem::new()));
    let mut observer = ProgressBarObserver::new(out.is_quiet());
    let report = service.apply(&structure.root, output_dir, options, &mut observer)?;
    observer.finish();
    for warning in &report.warnings {
        out.warning(warning)?;
    }
    Ok(report)
}

pub(crate) fn reconcile_options(ignore: IgnoreList, dry_run: bool) -> ReconcileOptions {
    ReconcileOptions {
        dry_run,
        ignore,
        ..ReconcileOptions::default()
    }
}

const REPORTED: [(OperationKind, &str); 4] = [
    (OperationKind::CreateFolder, "folders created"),
    (OperationKind::CreateFile, "files created"),
    (OperationKind::Copy, "files copied"),
    (OperationKind::Delete, "entries deleted"),
];

/// Print a reconcile report: every operation with `--detailed`, counts only
/// with `--summary`, otherwise the changes followed by the counts.
pub(crate) fn print_report(
    out: &OutputManager,
    report: &ReconcileReport,
    args: ReportArgs,
    dry_run: bool,
) -> CliResult<()> {
    if report.is_noop() {
        out.info("Already in sync, nothing to do")?;
        return Ok(());
    }
    if !args.summary {
        for op in &report.operations {
            if op.kind.is_change() || args.detailed {
                out.detail(&format!("{:<13} {}", op.kind.as_str(), display_path(&op.path)))?;
            }
        }
    }
    let counts: Vec<String> = REPORTED
        .iter()
        .map(|(kind, label)| (report.count(*kind), label))
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();
    let prefix = if dry_run { "Dry run: would apply" } else { "Applied" };
    out.success(&format!("{prefix} {}", counts.join(", ")))?;
    Ok(())
}

fn display_path(path: &LogicalPath) -> String {
    if path.is_root() {
        ".".into()
    } else {
        path.to_string()
    }
}

// ── history ───────────────────────────────────────────────────────────────────

/// Write an audit entry. Failures are logged, never fatal.
pub(crate) fn record_history(layout: &ProjectLayout, entry: &HistoryEntry) {
    let writer = JsonHistoryWriter::new(layout.history_dir());
    if let Err(e) = writer.record(entry) {
        warn!(error = %e, "could not record history");
    }
}

/// Arguments of the running process, for history entries.
pub(crate) fn invocation_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

// ── mutation ──────────────────────────────────────────────────────────────────

/// Save a mutated structure, record it, and sync the base directory.
///
/// `before` is the serialized structure prior to the change. In a dry run
/// nothing is written; the reconcile plan is shown instead.
pub(crate) fn commit(
    layout: &ProjectLayout,
    config: &AppConfig,
    out: &OutputManager,
    change: Change<'_>,
) -> CliResult<()> {
    let Change {
        command,
        before,
        structure,
        operation,
        apply,
        report,
        moved,
    } = change;
    let options = reconcile_options(ignore_list(layout, config)?, apply.dry_run);

    if apply.dry_run {
        out.info("Dry run: structure.sr left unchanged")?;
        let preview = reconcile(structure, layout.base(), &options, out)?;
        return print_report(out, &preview, report, true);
    }

    let plan = ReconcileService::new(Box::new(LocalFilesystem::new())).plan(
        &structure.root,
        layout.base(),
        &options,
    )?;
    let moving_away = |path: &LogicalPath| {
        moved
            .as_ref()
            .is_some_and(|(from, _)| path.starts_with(from))
    };
    for op in plan
        .iter()
        .filter(|op| op.kind == OperationKind::Delete && !moving_away(&op.path))
    {
        out.warning(&format!("will delete {}", op.path))?;
    }
    if !crate::prompt::confirm(&format!("Apply '{command}'?"), apply.yes)? {
        return Err(CliError::Cancelled);
    }

    layout.save_structure(structure)?;
    let entry = HistoryEntry::new(command, invocation_args(), before)
        .with_operation(operation)
        .finish(structure.to_sr());
    record_history(layout, &entry);

    if let Some((from, to)) = &moved {
        move_on_disk(layout, from, to)?;
    }
    let applied = reconcile(structure, layout.base(), &options, out)?;
    print_report(out, &applied, report, false)
}

/// One structural change, ready for [`commit`].
pub(crate) struct Change<'a> {
    pub command: &'static str,
    pub before: String,
    pub structure: &'a Structure,
    pub operation: HistoryOperation,
    pub apply: ApplyArgs,
    pub report: ReportArgs,
    /// Entry to move on disk before syncing, so its contents survive.
    pub moved: Option<(LogicalPath, LogicalPath)>,
}

fn move_on_disk(layout: &ProjectLayout, from: &LogicalPath, to: &LogicalPath) -> CliResult<()> {
    let fs = LocalFilesystem::new();
    let from = to_native(layout.base(), from);
    let to = to_native(layout.base(), to);
    if fs.exists(&from) && !fs.exists(&to) {
        fs.rename(&from, &to)?;
        debug!(from = %from.display(), to = %to.display(), "renamed on disk");
    }
    Ok(())
}
