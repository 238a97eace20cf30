//! Project overrides shadow bundled resources.

use std::fs;

use rigger_templates::{Resources, GITIGNORE_FALLBACK, OVERRIDE_DIR, README_TEMPLATE};
use serde_json::json;
use tempfile::TempDir;

fn write_override(root: &std::path::Path, name: &str, body: &str) {
    let path = root.join(OVERRIDE_DIR).join(name);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, body).expect("write");
}

#[test]
fn missing_override_dir_yields_bundled_set() {
    let dir = TempDir::new().expect("tempdir");
    let res = Resources::for_project(dir.path()).expect("resources");
    assert!(res.overridden().is_empty());
    assert_eq!(
        res.raw(GITIGNORE_FALLBACK).expect("raw"),
        Resources::new().expect("bundled").raw(GITIGNORE_FALLBACK).expect("raw")
    );
}

#[test]
fn raw_override_replaces_bundled_text() {
    let dir = TempDir::new().expect("tempdir");
    write_override(dir.path(), "gitignore/Rust.gitignore", "custom/\n");

    let res = Resources::for_project(dir.path()).expect("resources");
    assert_eq!(res.raw(GITIGNORE_FALLBACK).expect("raw"), "custom/\n");
    assert_eq!(res.overridden(), &[GITIGNORE_FALLBACK.to_string()]);
}

#[test]
fn template_override_is_rendered() {
    let dir = TempDir::new().expect("tempdir");
    write_override(dir.path(), "readme.md.tera", "## {{ name | upper }}\n");

    let res = Resources::for_project(dir.path()).expect("resources");
    let out = res
        .render(README_TEMPLATE, &json!({ "name": "demo", "engine_version": "1" }))
        .expect("render");
    assert_eq!(out, "## DEMO\n");
}

#[test]
fn extra_project_resources_are_addressable() {
    let dir = TempDir::new().expect("tempdir");
    write_override(dir.path(), "extra/notes.txt", "hello\n");

    let res = Resources::for_project(dir.path()).expect("resources");
    assert_eq!(res.raw("extra/notes.txt").expect("raw"), "hello\n");
}

#[test]
fn broken_template_override_is_a_tera_error() {
    let dir = TempDir::new().expect("tempdir");
    write_override(dir.path(), "readme.md.tera", "{% if %}\n");

    let err = Resources::for_project(dir.path()).unwrap_err();
    assert!(matches!(err, rigger_templates::ResourceError::Tera(_)), "got: {err}");
}

#[test]
fn bundled_resources_have_no_crlf() {
    let res = Resources::new().expect("bundled");
    for name in res.names() {
        assert!(!res.raw(name).expect("raw").contains('\r'), "{name} contains CRLF");
    }
}
