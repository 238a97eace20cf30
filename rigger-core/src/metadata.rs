//! Dependency metadata sources.
//!
//! # Sources
//!
//! - A YAML package index (`root:` plus a `packages:` list), read and written
//!   with the `_at(path)` pattern used throughout the workspace.
//! - `cargo metadata --format-version 1` JSON, either parsed from a string or
//!   produced by running cargo in a project directory.
//!
//! Both produce a [`PackageIndex`], which the graph walker treats as opaque input.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::{io_err, MetadataError};
use crate::types::{Package, PackageIndex, PackageName};

// ---------------------------------------------------------------------------
// 1. YAML package index
// ---------------------------------------------------------------------------

/// Load a package index from a YAML file.
///
/// Returns `MetadataError::Parse` (with path + line context) if malformed.
pub fn load_index_at(path: &Path) -> Result<PackageIndex, MetadataError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let mut index: PackageIndex = serde_yaml::from_str(&contents).map_err(|e| {
        MetadataError::Parse {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    // Relative package roots are resolved against the index file's directory.
    if let Some(base) = path.parent() {
        for package in &mut index.packages {
            if package.root.is_relative() {
                package.root = base.join(&package.root);
            }
        }
    }
    Ok(index)
}

/// Atomically save a package index as YAML.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `rename`.
pub fn save_index_at(path: &Path, index: &PackageIndex) -> Result<(), MetadataError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let yaml = serde_yaml::to_string(index)?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// 2. cargo metadata
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CargoMetadata {
    packages: Vec<CargoPackage>,
    resolve: Option<CargoResolve>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
    id: String,
    manifest_path: PathBuf,
    #[serde(default)]
    rust_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CargoResolve {
    root: Option<String>,
    nodes: Vec<CargoNode>,
}

#[derive(Debug, Deserialize)]
struct CargoNode {
    id: String,
    #[serde(default)]
    deps: Vec<CargoNodeDep>,
}

#[derive(Debug, Deserialize)]
struct CargoNodeDep {
    pkg: String,
    #[serde(default)]
    dep_kinds: Vec<CargoDepKind>,
}

#[derive(Debug, Deserialize)]
struct CargoDepKind {
    kind: Option<String>,
}

impl CargoNodeDep {
    /// Dev-only edges may legally form cycles and never ship with the package.
    fn is_dev_only(&self) -> bool {
        !self.dep_kinds.is_empty()
            && self
                .dep_kinds
                .iter()
                .all(|k| k.kind.as_deref() == Some("dev"))
    }
}

/// Build a [`PackageIndex`] from `cargo metadata --format-version 1` output.
///
/// Dependencies come from the resolved graph, so optional dependencies that
/// were not activated never appear as missing packages. Dev-only edges are
/// dropped.
pub fn index_from_cargo_metadata(json: &str) -> Result<PackageIndex, MetadataError> {
    let metadata: CargoMetadata = serde_json::from_str(json)?;
    let resolve = metadata.resolve.ok_or(MetadataError::NoRootPackage)?;

    let names: HashMap<&str, &str> = metadata
        .packages
        .iter()
        .map(|p| (p.id.as_str(), p.name.as_str()))
        .collect();
    let root_id = resolve.root.as_deref().ok_or(MetadataError::NoRootPackage)?;
    let root = names
        .get(root_id)
        .map(|n| PackageName::from(*n))
        .ok_or(MetadataError::NoRootPackage)?;

    let deps_by_id: HashMap<&str, Vec<PackageName>> = resolve
        .nodes
        .iter()
        .map(|node| {
            let mut deps: Vec<PackageName> = node
                .deps
                .iter()
                .filter(|d| !d.is_dev_only())
                .filter_map(|d| names.get(d.pkg.as_str()).map(|n| PackageName::from(*n)))
                .collect();
            deps.sort();
            deps.dedup();
            (node.id.as_str(), deps)
        })
        .collect();

    let mut packages: Vec<Package> = metadata
        .packages
        .iter()
        .map(|p| Package {
            name: PackageName::from(p.name.as_str()),
            root: p
                .manifest_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            dependencies: deps_by_id.get(p.id.as_str()).cloned().unwrap_or_default(),
            rust_version: p.rust_version.clone(),
        })
        .collect();
    packages.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(PackageIndex { root, packages })
}

/// Run `cargo metadata` in `project_root` and parse the result.
pub fn cargo_metadata_at(project_root: &Path) -> Result<PackageIndex, MetadataError> {
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let output = Command::new(&cargo)
        .args(["metadata", "--format-version", "1"])
        .current_dir(project_root)
        .output()
        .map_err(|e| io_err(project_root, e))?;
    if !output.status.success() {
        return Err(MetadataError::Command {
            command: format!("{cargo} metadata"),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    tracing::debug!(root = %project_root.display(), "loaded cargo metadata");
    index_from_cargo_metadata(&stdout)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
