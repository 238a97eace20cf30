//! Error types for rigger-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ModulePath, PackageName};

/// Malformed or cyclic dependency metadata. Fatal to the whole session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The dependency graph reachable from the root contains a cycle.
    #[error("dependency cycle detected among: {}", join_names(.packages))]
    Cycle { packages: Vec<PackageName> },

    /// A package declares a dependency that is not installed.
    #[error("package '{package}' depends on '{dependency}', which cannot be located")]
    MissingDependency {
        package: PackageName,
        dependency: PackageName,
    },

    /// The requested root package is not present in the index.
    #[error("package '{0}' not found in dependency metadata")]
    UnknownPackage(PackageName),

    /// The root package does not depend on the engine's base package.
    #[error("package '{root}' does not depend on '{base}'")]
    NotDependent { root: PackageName, base: PackageName },
}

/// Malformed package layout. The package is skipped and the error logged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("malformed package metadata for '{package}': {reason}")]
    MalformedPackage { package: PackageName, reason: String },

    /// The extension point path is not rooted in the base package.
    #[error("extension point '{path}' is not part of base package '{base}'")]
    ForeignPath { path: ModulePath, base: PackageName },
}

/// Failures while reading dependency metadata from disk or from cargo.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse package index at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse cargo metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// Virtual workspaces have no root package to drive.
    #[error("cargo metadata reports no root package; run inside a package directory")]
    NoRootPackage,

    #[error("`{command}` failed: {stderr}")]
    Command { command: String, stderr: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> MetadataError {
    MetadataError::Io {
        path: path.into(),
        source,
    }
}

fn join_names(names: &[PackageName]) -> String {
    names
        .iter()
        .map(|n| n.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
