//! Library-level runs with a catalog extended the way a dependent package would.

use std::fs;
use std::path::Path;

use clap::Parser;
use rigger::{run, BuildContext, Builder, Candidate, Catalog, Cli, HookError};
use rigger_build::platform::host_platform;
use tempfile::TempDir;

const INDEX: &str = "\
root: demo
packages:
  - name: demo
    root: .
    dependencies: [rigger]
  - name: rigger
    root: vendor/rigger
";

struct Archive;

impl Builder for Archive {
    fn create_artifacts(&self, scratch: &Path, ctx: &BuildContext) -> Result<(), HookError> {
        fs::write(scratch.join(format!("{}.zip", self.app_name(ctx))), b"zip")?;
        Ok(())
    }
}

struct Broken;

impl Builder for Broken {
    fn create_artifacts(&self, _scratch: &Path, _ctx: &BuildContext) -> Result<(), HookError> {
        Err("linker not found".into())
    }
}

fn archive() -> Box<dyn Builder> {
    Box::new(Archive)
}

fn broken() -> Box<dyn Builder> {
    Box::new(Broken)
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("packages.yaml"), INDEX).expect("index");
    dir
}

fn parse(dir: &Path, command: &str) -> Cli {
    let root = dir.to_string_lossy().into_owned();
    let metadata = dir.join("packages.yaml").to_string_lossy().into_owned();
    Cli::try_parse_from([
        "rigger",
        "--root",
        root.as_str(),
        "--metadata",
        metadata.as_str(),
        "--offline",
        command,
    ])
    .expect("parse")
}

#[test]
fn registered_builder_lands_in_dist() {
    let dir = project();
    let mut catalog = Catalog::builtin();
    catalog
        .builders
        .module_for("demo")
        .register(Candidate::concrete("demo::dev::builders::Archive", archive));

    run(parse(dir.path(), "build"), &catalog).expect("build");

    let artifact = dir
        .path()
        .join("dist")
        .join(format!("demo-{}.zip", host_platform()));
    assert_eq!(fs::read(artifact).expect("artifact"), b"zip");
}

#[test]
fn failing_builder_is_an_error_after_the_others_ran() {
    let dir = project();
    let mut catalog = Catalog::builtin();
    catalog
        .builders
        .module_for("demo")
        .register(Candidate::concrete("demo::dev::builders::Broken", broken))
        .register(Candidate::concrete("demo::dev::builders::Archive", archive));

    let err = run(parse(dir.path(), "build"), &catalog).unwrap_err();
    assert!(err.to_string().contains("1 of 2 builders failed"), "got: {err}");
    assert!(dir
        .path()
        .join("dist")
        .join(format!("demo-{}.zip", host_platform()))
        .exists());
}

#[test]
fn replacing_a_builtin_entity_changes_what_converge_writes() {
    use rigger::{ConfigEntity, ConvergeError, Format, ProjectContext, State};

    struct Notes;

    impl ConfigEntity for Notes {
        fn relative_path(&self) -> std::path::PathBuf {
            "README.md".into()
        }
        fn format(&self) -> Format {
            Format::Lines
        }
        fn expected(&self, _ctx: &ProjectContext) -> Result<State, ConvergeError> {
            Ok(State::list(["# notes"]))
        }
    }

    fn notes() -> Box<dyn ConfigEntity> {
        Box::new(Notes)
    }

    let dir = project();
    let mut catalog = Catalog::builtin();
    catalog.configs.module_for("demo").register(
        Candidate::concrete("demo::dev::configs::Notes", notes)
            .replaces(rigger_sync::builtin::readme::ID),
    );

    run(parse(dir.path(), "converge"), &catalog).expect("converge");

    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).expect("readme"),
        "# notes\n"
    );
}
