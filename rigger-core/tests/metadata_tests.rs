//! Package index error messages and atomic-write safety.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rigger_core::{
    metadata,
    types::{Package, PackageIndex, PackageName},
    MetadataError, Session,
};
use std::fs;

fn sample_index(root: &std::path::Path) -> PackageIndex {
    PackageIndex {
        root: PackageName::from("app"),
        packages: vec![
            Package {
                name: PackageName::from("app"),
                root: root.join("app"),
                dependencies: vec![PackageName::from("rigger")],
                rust_version: Some("1.75".into()),
            },
            Package {
                name: PackageName::from("rigger"),
                root: root.join("rigger"),
                dependencies: vec![],
                rust_version: None,
            },
        ],
    }
}

#[test]
fn load_missing_index_reports_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("packages.yaml");
    let err = metadata::load_index_at(&path).unwrap_err();
    assert!(matches!(err, MetadataError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("packages.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("packages.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed").expect("write");

    let err = metadata::load_index_at(file.path()).unwrap_err();
    assert!(matches!(err, MetadataError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("packages.yaml"));
}

#[test]
fn load_wrong_shape_returns_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("packages.yaml");
    file.write_str("- this is a list, not a mapping\n").expect("write");

    let err = metadata::load_index_at(file.path()).unwrap_err();
    assert!(matches!(err, MetadataError::Parse { .. }), "got: {err}");
}

#[test]
fn save_writes_index_and_cleans_tmp() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("meta").join("packages.yaml");
    metadata::save_index_at(&path, &sample_index(dir.path())).expect("save");

    dir.child("meta/packages.yaml")
        .assert(predicate::str::contains("name: rigger"));
    dir.child("meta/packages.yaml.tmp")
        .assert(predicate::path::missing());
}

#[test]
fn interrupted_save_leaves_original_intact() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("packages.yaml");
    metadata::save_index_at(&path, &sample_index(dir.path())).expect("save");
    let original = fs::read(&path).expect("read");

    // Crash between tmp write and rename: only the sibling changes.
    fs::write(path.with_extension("yaml.tmp"), b"CRASH - INCOMPLETE WRITE").expect("tmp");

    assert_eq!(fs::read(&path).expect("read"), original);
    assert_eq!(metadata::load_index_at(&path).expect("load"), sample_index(dir.path()));
}

// ---------------------------------------------------------------------------
// cargo metadata through a session
// ---------------------------------------------------------------------------

/// `app` depends on the published `rigger` package, which pulls in the
/// engine crates. `app-testkit` is a dev-dependency of `app` that depends
/// back on it, which cargo allows.
const CARGO_METADATA: &str = r#"{
    "packages": [
        {"name": "app", "id": "path+file:///w/app#0.1.0",
         "manifest_path": "/w/app/Cargo.toml", "rust_version": "1.75"},
        {"name": "app-testkit", "id": "path+file:///w/app/testkit#0.1.0",
         "manifest_path": "/w/app/testkit/Cargo.toml"},
        {"name": "rigger", "id": "registry+https://github.com/rust-lang/crates.io-index#rigger@0.1.11",
         "manifest_path": "/reg/rigger-0.1.11/Cargo.toml"},
        {"name": "rigger-core", "id": "registry+https://github.com/rust-lang/crates.io-index#rigger-core@0.1.11",
         "manifest_path": "/reg/rigger-core-0.1.11/Cargo.toml"},
        {"name": "rigger-sync", "id": "registry+https://github.com/rust-lang/crates.io-index#rigger-sync@0.1.11",
         "manifest_path": "/reg/rigger-sync-0.1.11/Cargo.toml"},
        {"name": "serde", "id": "registry+https://github.com/rust-lang/crates.io-index#serde@1.0.200",
         "manifest_path": "/reg/serde-1.0.200/Cargo.toml"}
    ],
    "resolve": {
        "root": "path+file:///w/app#0.1.0",
        "nodes": [
            {"id": "path+file:///w/app#0.1.0",
             "deps": [
                {"name": "rigger", "pkg": "registry+https://github.com/rust-lang/crates.io-index#rigger@0.1.11",
                 "dep_kinds": [{"kind": null, "target": null}]},
                {"name": "app_testkit", "pkg": "path+file:///w/app/testkit#0.1.0",
                 "dep_kinds": [{"kind": "dev", "target": null}]}
             ]},
            {"id": "path+file:///w/app/testkit#0.1.0",
             "deps": [
                {"name": "app", "pkg": "path+file:///w/app#0.1.0",
                 "dep_kinds": [{"kind": null, "target": null}]}
             ]},
            {"id": "registry+https://github.com/rust-lang/crates.io-index#rigger@0.1.11",
             "deps": [
                {"name": "rigger_core", "pkg": "registry+https://github.com/rust-lang/crates.io-index#rigger-core@0.1.11",
                 "dep_kinds": [{"kind": null, "target": null}]},
                {"name": "rigger_sync", "pkg": "registry+https://github.com/rust-lang/crates.io-index#rigger-sync@0.1.11",
                 "dep_kinds": [{"kind": null, "target": null}]}
             ]},
            {"id": "registry+https://github.com/rust-lang/crates.io-index#rigger-sync@0.1.11",
             "deps": [
                {"name": "rigger_core", "pkg": "registry+https://github.com/rust-lang/crates.io-index#rigger-core@0.1.11",
                 "dep_kinds": [{"kind": null, "target": null}]},
                {"name": "serde", "pkg": "registry+https://github.com/rust-lang/crates.io-index#serde@1.0.200",
                 "dep_kinds": [{"kind": null, "target": null}]}
             ]},
            {"id": "registry+https://github.com/rust-lang/crates.io-index#rigger-core@0.1.11",
             "deps": [
                {"name": "serde", "pkg": "registry+https://github.com/rust-lang/crates.io-index#serde@1.0.200",
                 "dep_kinds": [{"kind": null, "target": null}]}
             ]},
            {"id": "registry+https://github.com/rust-lang/crates.io-index#serde@1.0.200", "deps": []}
        ]
    }
}"#;

#[test]
fn cargo_metadata_session_walks_from_rigger_to_root() {
    let index = metadata::index_from_cargo_metadata(CARGO_METADATA).expect("parse");
    let session = Session::new(index);

    let names: Vec<&str> = session
        .packages()
        .expect("walk")
        .iter()
        .map(|p| p.name.0.as_str())
        .collect();
    assert_eq!(names, vec!["rigger", "app"]);
    assert_eq!(
        session.root_package().expect("root").root,
        std::path::PathBuf::from("/w/app")
    );
}

#[test]
fn cargo_metadata_drops_dev_only_edges() {
    let index = metadata::index_from_cargo_metadata(CARGO_METADATA).expect("parse");
    let app = index.root_package().expect("root");
    assert_eq!(app.dependencies, vec![PackageName::from("rigger")]);
}
