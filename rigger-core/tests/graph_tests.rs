//! Graph walker ordering, diamond, and failure-mode tests.

use std::path::PathBuf;

use rigger_core::{
    graph::walk,
    types::{Package, PackageIndex, PackageName},
    GraphError,
};
use rstest::rstest;

fn pkg(name: &str, deps: &[&str]) -> Package {
    Package {
        name: PackageName::from(name),
        root: PathBuf::from("/pkgs").join(name),
        dependencies: deps.iter().map(|d| PackageName::from(*d)).collect(),
        rust_version: None,
    }
}

fn index(root: &str, packages: Vec<Package>) -> PackageIndex {
    PackageIndex {
        root: PackageName::from(root),
        packages,
    }
}

fn position(order: &[Package], name: &str) -> usize {
    order
        .iter()
        .position(|p| p.name.0 == name)
        .unwrap_or_else(|| panic!("{name} missing from walk"))
}

/// Assert no package precedes any of its own dependencies within the walk.
fn assert_topological(order: &[Package]) {
    for (i, package) in order.iter().enumerate() {
        for dep in &package.dependencies {
            if let Some(j) = order.iter().position(|p| &p.name == dep) {
                assert!(j < i, "{} placed before its dependency {}", package.name, dep);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 1. Ordering
// ---------------------------------------------------------------------------

#[rstest]
#[case::chain(index("app", vec![
    pkg("app", &["mid"]),
    pkg("mid", &["rigger"]),
    pkg("rigger", &[]),
]))]
#[case::diamond(index("app", vec![
    pkg("app", &["left", "right"]),
    pkg("left", &["rigger"]),
    pkg("right", &["rigger"]),
    pkg("rigger", &["serde"]),
    pkg("serde", &[]),
]))]
#[case::deep_diamond(index("app", vec![
    pkg("app", &["z-plugin", "a-plugin", "rigger"]),
    pkg("a-plugin", &["shared"]),
    pkg("z-plugin", &["shared", "a-plugin"]),
    pkg("shared", &["rigger"]),
    pkg("rigger", &[]),
]))]
fn walk_is_topological(#[case] idx: PackageIndex) {
    let order = walk(&idx, &idx.root, &"rigger".into()).expect("walk");
    assert_topological(&order);
    assert_eq!(order.first().map(|p| p.name.0.as_str()), Some("rigger"));
    assert_eq!(order.last().map(|p| p.name.0.as_str()), Some("app"));
}

#[test]
fn diamond_includes_each_package_once() {
    let idx = index(
        "app",
        vec![
            pkg("app", &["left", "right"]),
            pkg("left", &["rigger"]),
            pkg("right", &["rigger"]),
            pkg("rigger", &[]),
        ],
    );
    let order = walk(&idx, &idx.root, &"rigger".into()).expect("walk");
    let names: Vec<_> = order.iter().map(|p| p.name.0.as_str()).collect();
    assert_eq!(names, vec!["rigger", "left", "right", "app"]);
}

#[test]
fn walk_order_is_reproducible() {
    let idx = index(
        "app",
        vec![
            pkg("app", &["c", "b", "a"]),
            pkg("a", &["rigger"]),
            pkg("b", &["rigger"]),
            pkg("c", &["rigger"]),
            pkg("rigger", &[]),
        ],
    );
    let first = walk(&idx, &idx.root, &"rigger".into()).expect("walk");
    for _ in 0..10 {
        assert_eq!(walk(&idx, &idx.root, &"rigger".into()).expect("walk"), first);
    }
}

#[test]
fn packages_not_depending_on_base_are_skipped() {
    let idx = index(
        "app",
        vec![
            pkg("app", &["rigger", "tokio"]),
            pkg("tokio", &["bytes"]),
            pkg("bytes", &[]),
            pkg("rigger", &[]),
        ],
    );
    let order = walk(&idx, &idx.root, &"rigger".into()).expect("walk");
    assert_eq!(order.len(), 2);
    assert!(position(&order, "rigger") < position(&order, "app"));
}

// ---------------------------------------------------------------------------
// 2. Failures
// ---------------------------------------------------------------------------

#[test]
fn cycle_is_reported_with_members() {
    let idx = index(
        "app",
        vec![
            pkg("app", &["a"]),
            pkg("a", &["b", "rigger"]),
            pkg("b", &["a"]),
            pkg("rigger", &[]),
        ],
    );
    let err = walk(&idx, &idx.root, &"rigger".into()).unwrap_err();
    match &err {
        GraphError::Cycle { packages } => {
            assert!(packages.contains(&PackageName::from("a")));
            assert!(packages.contains(&PackageName::from("b")));
        }
        other => panic!("expected cycle, got {other:?}"),
    }
    assert!(err.to_string().contains("cycle"));
}

#[test]
fn cycle_outside_the_walked_set_still_fails() {
    let idx = index(
        "app",
        vec![
            pkg("app", &["rigger", "x"]),
            pkg("rigger", &[]),
            pkg("x", &["y"]),
            pkg("y", &["x"]),
        ],
    );
    let err = walk(&idx, &idx.root, &"rigger".into()).unwrap_err();
    let GraphError::Cycle { packages } = err else {
        panic!("expected cycle, got {err:?}");
    };
    assert!(packages.contains(&PackageName::from("x")));
    assert!(packages.contains(&PackageName::from("y")));
    assert!(!packages.contains(&PackageName::from("rigger")));
}

#[test]
fn missing_dependency_is_reported() {
    let idx = index("app", vec![pkg("app", &["rigger", "ghost"]), pkg("rigger", &[])]);
    let err = walk(&idx, &idx.root, &"rigger".into()).unwrap_err();
    assert_eq!(
        err,
        GraphError::MissingDependency {
            package: "app".into(),
            dependency: "ghost".into(),
        }
    );
}

#[test]
fn root_without_base_is_not_dependent() {
    let idx = index("app", vec![pkg("app", &["serde"]), pkg("serde", &[])]);
    let err = walk(&idx, &idx.root, &"rigger".into()).unwrap_err();
    assert!(matches!(err, GraphError::NotDependent { .. }));
}
