//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "scaffoldrite",
    bin_name = "scaffoldrite",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Declare a project layout, enforce it, and keep a directory in sync",
    long_about = "Scaffoldrite keeps the layout of a project in .scaffoldrite/structure.sr, \
                  checks it against constraints, and syncs real directories to it.",
    after_help = "EXAMPLES:\n\
        \x20 scaffoldrite init\n\
        \x20 scaffoldrite create src/components/Button.tsx file\n\
        \x20 scaffoldrite validate --allow-extra dist\n\
        \x20 scaffoldrite generate ./out --dry-run\n\
        \x20 scaffoldrite completions bash > /usr/share/bash-completion/completions/scaffoldrite",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create `.scaffoldrite/structure.sr`.
    #[command(
        about = "Initialise a project structure",
        after_help = "EXAMPLES:\n\
            \x20 scaffoldrite init              # starter template\n\
            \x20 scaffoldrite init --empty      # no nodes, no constraints\n\
            \x20 scaffoldrite init --from-fs .  # import the current directory"
    )]
    Init(InitArgs),

    /// Replace the declared tree with an import of a directory.
    #[command(about = "Re-import the directory into structure.sr")]
    Update(SyncArgs),

    /// Merge an import of a directory into the declared tree.
    #[command(about = "Add on-disk entries to structure.sr")]
    Merge(SyncArgs),

    /// Check constraints and the base directory.
    #[command(
        about = "Validate constraints and the filesystem",
        after_help = "EXAMPLES:\n\
            \x20 scaffoldrite validate\n\
            \x20 scaffoldrite validate --allow-extra            # accept any extra entry\n\
            \x20 scaffoldrite validate --allow-extra dist .env  # accept these only"
    )]
    Validate(ValidateArgs),

    /// Sync a directory to the declared tree.
    #[command(
        visible_alias = "gen",
        about = "Generate (or sync) a directory from structure.sr",
        after_help = "EXAMPLES:\n\
            \x20 scaffoldrite generate                # sync the base directory\n\
            \x20 scaffoldrite generate ./out --copy   # copy file contents too\n\
            \x20 scaffoldrite generate --dry-run --detailed"
    )]
    Generate(GenerateArgs),

    /// Print the declared tree, the on-disk tree, or their difference.
    #[command(visible_alias = "ls", about = "Show the structure")]
    List(ListArgs),

    /// Add a file or folder.
    #[command(
        about = "Create a file or folder",
        after_help = "EXAMPLES:\n\
            \x20 scaffoldrite create src/lib folder\n\
            \x20 scaffoldrite create src/lib/index.ts file --if-not-exists"
    )]
    Create(CreateArgs),

    /// Remove a file or folder.
    #[command(visible_alias = "rm", about = "Delete a file or folder")]
    Delete(DeleteArgs),

    /// Rename a file or folder in place.
    #[command(visible_alias = "mv", about = "Rename a file or folder")]
    Rename(RenameArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 scaffoldrite completions bash > ~/.local/share/bash-completion/completions/scaffoldrite\n\
            \x20 scaffoldrite completions zsh  > ~/.zfunc/_scaffoldrite\n\
            \x20 scaffoldrite completions fish > ~/.config/fish/completions/scaffoldrite.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Scaffoldrite configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 scaffoldrite config path\n\
            \x20 scaffoldrite config list\n\
            \x20 scaffoldrite config init --force"
    )]
    Config(ConfigCommands),
}

// ── shared flags ──────────────────────────────────────────────────────────────

/// Confirmation and dry-run flags shared by mutating commands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ApplyArgs {
    /// Skip confirmation prompts.
    #[arg(short = 'y', long = "yes", help = "Assume yes for all prompts")]
    pub yes: bool,

    /// Show what would change without writing anything.
    #[arg(long = "dry-run", help = "Preview changes without applying them")]
    pub dry_run: bool,
}

/// How much of a reconcile report to print.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ReportArgs {
    /// List every operation, including skips.
    #[arg(long, conflicts_with = "summary", help = "Print every operation")]
    pub detailed: bool,

    /// Print only the counts.
    #[arg(long, help = "Print only operation counts")]
    pub summary: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `scaffoldrite init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Start with no nodes and no constraints.
    #[arg(long, conflicts_with = "from_fs")]
    pub empty: bool,

    /// Import an existing directory (defaults to the base directory).
    #[arg(
        long = "from-fs",
        value_name = "DIR",
        num_args = 0..=1,
        help = "Build the structure from a directory"
    )]
    pub from_fs: Option<Option<PathBuf>>,

    /// Overwrite an existing structure.sr.
    #[arg(short = 'f', long)]
    pub force: bool,
}

// ── update / merge ────────────────────────────────────────────────────────────

/// Arguments for `scaffoldrite update` and `scaffoldrite merge`.
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Directory to import (defaults to the base directory).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Skip confirmation prompts.
    #[arg(short = 'y', long = "yes", help = "Assume yes for all prompts")]
    pub yes: bool,
}

// ── validate ──────────────────────────────────────────────────────────────────

/// Arguments for `scaffoldrite validate`.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Accept extra entries on disk. Without values every extra is accepted.
    #[arg(
        long = "allow-extra",
        value_name = "PATH",
        num_args = 0..,
        help = "Allow extra (or listed) paths on disk"
    )]
    pub allow_extra: Option<Vec<String>>,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `scaffoldrite generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Output directory (defaults to the base directory).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[command(flatten)]
    pub apply: ApplyArgs,

    /// Copy file contents from the base directory.
    #[arg(long)]
    pub copy: bool,

    /// Do not copy `.scaffoldrite/` into the output directory.
    #[arg(long = "ignore-tooling")]
    pub ignore_tooling: bool,

    #[command(flatten)]
    pub report: ReportArgs,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `scaffoldrite list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Show the declared tree (default).
    #[arg(long, conflicts_with_all = ["fs", "diff"])]
    pub structure: bool,

    /// Show the directory on disk.
    #[arg(long, conflicts_with = "diff")]
    pub fs: bool,

    /// Show what differs between the two.
    #[arg(long)]
    pub diff: bool,

    /// Prefix entries with folder/file icons.
    #[arg(long = "with-icon")]
    pub with_icon: bool,
}

impl ListArgs {
    pub fn resolved_source(&self) -> ListSource {
        if self.fs {
            ListSource::Fs
        } else if self.diff {
            ListSource::Diff
        } else {
            ListSource::Structure
        }
    }
}

/// Tree shown by `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    Structure,
    Fs,
    Diff,
}

// ── create / delete / rename ──────────────────────────────────────────────────

/// Arguments for `scaffoldrite create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Logical path of the new node, e.g. `src/lib/index.ts`.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Node kind.
    #[arg(value_enum, value_name = "TYPE")]
    pub kind: KindArg,

    /// Replace an existing node of the same kind.
    #[arg(long, conflicts_with = "if_not_exists")]
    pub force: bool,

    /// Succeed without changes when the node already exists.
    #[arg(long = "if-not-exists")]
    pub if_not_exists: bool,

    #[command(flatten)]
    pub apply: ApplyArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Arguments for `scaffoldrite delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(value_name = "PATH")]
    pub path: String,

    #[command(flatten)]
    pub apply: ApplyArgs,
}

/// Arguments for `scaffoldrite rename`.
#[derive(Debug, Args)]
pub struct RenameArgs {
    #[arg(value_name = "PATH")]
    pub path: String,

    /// New basename (not a path).
    #[arg(value_name = "NEW_NAME")]
    pub new_name: String,

    #[command(flatten)]
    pub apply: ApplyArgs,
}

/// `file` or `folder` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    File,
    Folder,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `scaffoldrite completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `scaffoldrite config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the location of the configuration file.
    Path,
    /// Print the effective configuration as TOML.
    List,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(short = 'f', long)]
        force: bool,
    },
}
