//! Importer and FS validator against real directories.

use std::fs;

use scaffoldrite_adapters::{LocalFilesystem, ProjectLayout};
use scaffoldrite_core::domain::{merge, serialize};
use scaffoldrite_core::prelude::*;
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/utils")).unwrap();
    fs::write(root.join("src/utils/format.ts"), "").unwrap();
    fs::write(root.join("src/index.ts"), "").unwrap();
    fs::write(root.join("README.md"), "").unwrap();
    fs::create_dir_all(root.join(".scaffoldrite")).unwrap();
    fs::write(root.join(".scaffoldrite/structure.sr"), "").unwrap();
    dir
}

fn importer() -> FsImporter {
    FsImporter::new(Box::new(LocalFilesystem::new()))
}

#[test]
fn import_mirrors_the_directory() {
    let dir = project();
    let tree = importer()
        .import(dir.path(), &IgnoreList::defaults())
        .unwrap();

    let text = serialize(&Structure::new(tree));
    assert_eq!(
        text,
        "folder src {\n  folder utils {\n    file format.ts\n  }\n  file index.ts\n}\nfile README.md\n"
    );
}

#[test]
fn import_of_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    assert!(
        importer()
            .import(&dir.path().join("absent"), &IgnoreList::empty())
            .is_err()
    );
}

#[test]
fn imported_tree_validates_against_its_source() {
    let dir = project();
    let tree = importer()
        .import(dir.path(), &IgnoreList::defaults())
        .unwrap();

    let options = FsValidationOptions {
        ignore: IgnoreList::new([".scaffoldrite"]),
        ..Default::default()
    };
    FsValidator::new(Box::new(LocalFilesystem::new()))
        .validate(&tree, dir.path(), &options)
        .unwrap();
}

#[test]
fn validator_reports_first_extra_and_honours_suffix_allow() {
    let dir = project();
    let structure = Structure::parse("folder src {\n  folder utils {\n    file format.ts\n  }\n  file index.ts\n}\nfile README.md\n").unwrap();
    fs::write(dir.path().join("src/utils/extra.ts"), "").unwrap();

    let base = FsValidationOptions {
        ignore: IgnoreList::new([".scaffoldrite"]),
        ..Default::default()
    };
    let validator = FsValidator::new(Box::new(LocalFilesystem::new()));
    let err = validator
        .validate(&structure.root, dir.path(), &base)
        .unwrap_err();
    assert_eq!(err.to_string(), "Extra file or folder found: src/utils/extra.ts");

    let allowed = FsValidationOptions {
        allow_paths: vec!["utils/extra.ts".into()],
        ..base
    };
    validator
        .validate(&structure.root, dir.path(), &allowed)
        .unwrap();
}

#[test]
fn merge_of_import_keeps_declared_entries() {
    let dir = project();
    let layout = ProjectLayout::new(dir.path());
    let mut declared = Structure::parse("folder docs {\n  file guide.md\n}\n").unwrap();
    layout.save_structure(&declared).unwrap();

    let imported = importer()
        .import(dir.path(), &layout.load_ignore_list().unwrap())
        .unwrap();
    merge(&mut declared.root, &imported);
    layout.save_structure(&declared).unwrap();

    let reloaded = layout.load_structure().unwrap();
    assert!(reloaded.find(&"docs/guide.md".into()).is_some());
    assert!(reloaded.find(&"src/utils/format.ts".into()).is_some());
    assert!(reloaded.find(&".scaffoldrite".into()).is_none());
}
