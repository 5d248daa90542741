//! End-to-end tests for the `scaffoldrite` binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn scaffoldrite(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("scaffoldrite");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .args(["--no-color", "-C", "."]);
    cmd
}

fn structure(dir: &Path) -> String {
    fs::read_to_string(dir.join(".scaffoldrite/structure.sr")).unwrap()
}

fn initialized() -> TempDir {
    let temp = TempDir::new().unwrap();
    scaffoldrite(temp.path()).arg("init").assert().success();
    temp
}

// ── top level ─────────────────────────────────────────────────────────────────

#[test]
fn help_lists_commands() {
    cargo_bin_cmd!("scaffoldrite")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("--dir"));
}

#[test]
fn version_flag() {
    cargo_bin_cmd!("scaffoldrite")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_argument_exits_with_usage_error() {
    cargo_bin_cmd!("scaffoldrite")
        .args(["generate", "--bogus"])
        .assert()
        .code(2);
}

#[test]
fn completions_name_the_binary() {
    cargo_bin_cmd!("scaffoldrite")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scaffoldrite"));
}

// ── init ──────────────────────────────────────────────────────────────────────

#[test]
fn init_writes_template_and_ignore_file() {
    let temp = initialized();
    let text = structure(temp.path());
    assert!(text.contains("file index.ts"));
    assert!(text.contains("require src/index.ts"));
    assert!(temp.path().join(".scaffoldignore").is_file());
}

#[test]
fn init_twice_needs_force() {
    let temp = initialized();
    scaffoldrite(temp.path())
        .arg("init")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already initialized"))
        .stderr(predicate::str::contains("--force"));

    scaffoldrite(temp.path())
        .args(["init", "--empty", "--force"])
        .assert()
        .success();
    assert_eq!(structure(temp.path()), "");
}

#[test]
fn init_from_fs_imports_the_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("lib/utils")).unwrap();
    fs::write(temp.path().join("lib/utils/math.ts"), "export {}").unwrap();
    fs::create_dir_all(temp.path().join("node_modules/pkg")).unwrap();

    scaffoldrite(temp.path())
        .args(["init", "--from-fs"])
        .assert()
        .success();

    let text = structure(temp.path());
    assert!(text.contains("folder lib {"));
    assert!(text.contains("file math.ts"));
    assert!(!text.contains("node_modules"));
    assert!(!text.contains(".scaffoldrite"));
}

// ── validate / generate ───────────────────────────────────────────────────────

#[test]
fn commands_need_an_initialized_project() {
    let temp = TempDir::new().unwrap();
    scaffoldrite(temp.path())
        .arg("validate")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("scaffoldrite init"));
}

#[test]
fn validate_reports_missing_entries_until_generated() {
    let temp = initialized();
    scaffoldrite(temp.path())
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing folder: src"));

    scaffoldrite(temp.path())
        .args(["generate", "-y"])
        .assert()
        .success();
    assert!(temp.path().join("src/index.ts").is_file());
    assert!(temp.path().join("README.md").is_file());

    scaffoldrite(temp.path()).arg("validate").assert().success();
}

#[test]
fn validate_allow_extra() {
    let temp = initialized();
    scaffoldrite(temp.path()).args(["generate", "-y"]).assert().success();
    fs::write(temp.path().join("notes.md"), "").unwrap();

    scaffoldrite(temp.path())
        .arg("validate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Extra file or folder found: notes.md"));
    scaffoldrite(temp.path())
        .args(["validate", "--allow-extra", "notes.md"])
        .assert()
        .success();
    scaffoldrite(temp.path())
        .args(["validate", "--allow-extra"])
        .assert()
        .success();
}

#[test]
fn generate_dry_run_touches_nothing() {
    let temp = initialized();
    scaffoldrite(temp.path())
        .args(["generate", "--dry-run", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create-file"))
        .stdout(predicate::str::contains("src/index.ts"));
    assert!(!temp.path().join("src").exists());
}

#[test]
fn generate_twice_is_a_no_op() {
    let temp = initialized();
    scaffoldrite(temp.path()).args(["generate", "-y"]).assert().success();
    scaffoldrite(temp.path())
        .args(["generate", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already in sync"));
}

#[test]
fn generate_elsewhere_copies_contents_and_tooling() {
    let temp = initialized();
    scaffoldrite(temp.path()).args(["generate", "-y"]).assert().success();
    fs::write(temp.path().join("README.md"), "# Hello").unwrap();

    scaffoldrite(temp.path())
        .args(["generate", "out", "--copy", "-y"])
        .assert()
        .success();
    let out = temp.path().join("out");
    assert_eq!(fs::read_to_string(out.join("README.md")).unwrap(), "# Hello");
    assert!(out.join(".scaffoldrite/structure.sr").is_file());

    scaffoldrite(temp.path())
        .args(["generate", "out", "--ignore-tooling", "-y"])
        .assert()
        .success();
    assert!(!out.join(".scaffoldrite").exists());
}

// ── create / rename / delete ──────────────────────────────────────────────────

#[test]
fn create_rename_delete_round() {
    let temp = initialized();
    let dir = temp.path();

    scaffoldrite(dir)
        .args(["create", "src/components/Button.tsx", "file", "-y"])
        .assert()
        .success();
    assert!(structure(dir).contains("folder components {"));
    assert!(dir.join("src/components/Button.tsx").is_file());

    fs::write(dir.join("src/components/Button.tsx"), "export const B = 1;").unwrap();
    scaffoldrite(dir)
        .args(["rename", "src/components", "ui", "-y"])
        .assert()
        .success();
    assert!(structure(dir).contains("folder ui {"));
    assert_eq!(
        fs::read_to_string(dir.join("src/ui/Button.tsx")).unwrap(),
        "export const B = 1;"
    );
    assert!(!dir.join("src/components").exists());

    scaffoldrite(dir)
        .args(["delete", "src/ui", "-y"])
        .assert()
        .success();
    assert!(!structure(dir).contains("ui"));
    assert!(!dir.join("src/ui").exists());

    let history = fs::read_dir(dir.join(".scaffoldrite/history")).unwrap().count();
    assert_eq!(history, 3);
}

#[test]
fn create_if_not_exists_is_quiet_about_duplicates() {
    let temp = initialized();
    scaffoldrite(temp.path())
        .args(["create", "README.md", "file", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
    scaffoldrite(temp.path())
        .args(["create", "README.md", "file", "--if-not-exists", "-y"])
        .assert()
        .success();
}

#[test]
fn create_dry_run_leaves_structure_alone() {
    let temp = initialized();
    let before = structure(temp.path());
    scaffoldrite(temp.path())
        .args(["create", "docs", "folder", "--dry-run"])
        .assert()
        .success();
    assert_eq!(structure(temp.path()), before);
    assert!(!temp.path().join("docs").exists());
}

#[test]
fn delete_refuses_to_break_a_constraint() {
    let temp = initialized();
    scaffoldrite(temp.path())
        .args(["delete", "src/index.ts", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Constraint require failed"));
    assert!(structure(temp.path()).contains("file index.ts"));
}

// ── list ──────────────────────────────────────────────────────────────────────

#[test]
fn list_structure_and_json() {
    let temp = initialized();
    scaffoldrite(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/"))
        .stdout(predicate::str::contains("index.ts"));

    let output = scaffoldrite(temp.path())
        .args(["--output-format", "json", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.get("children").is_some());
}

#[test]
fn list_diff_shows_both_sides() {
    let temp = initialized();
    fs::write(temp.path().join("notes.md"), "").unwrap();
    scaffoldrite(temp.path())
        .args(["list", "--diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- src (folder)"))
        .stdout(predicate::str::contains("+ notes.md (file)"));
}

// ── update / merge ────────────────────────────────────────────────────────────

#[test]
fn merge_adds_and_update_replaces() {
    let temp = initialized();
    fs::create_dir_all(temp.path().join("docs")).unwrap();
    fs::write(temp.path().join("docs/guide.md"), "").unwrap();

    scaffoldrite(temp.path()).args(["merge", "-y"]).assert().success();
    let merged = structure(temp.path());
    assert!(merged.contains("file guide.md"));
    assert!(merged.contains("file index.ts"));

    scaffoldrite(temp.path()).args(["update", "-y"]).assert().success();
    let updated = structure(temp.path());
    assert!(updated.contains("file guide.md"));
    assert!(!updated.contains("file index.ts"));
    assert!(updated.contains("require src/index.ts"));
}
