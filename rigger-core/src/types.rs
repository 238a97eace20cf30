//! Domain types for package discovery.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Metadata types are serializable via serde + serde_yaml.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for an installed package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageName(pub String);

impl PackageName {
    /// Module-path identifier for this package (`my-app` → `my_app`).
    pub fn ident(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A `::`-separated logical module path, e.g. `rigger::dev::configs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(pub String);

impl ModulePath {
    /// First segment of the path (the owning package identifier).
    pub fn top_level(&self) -> &str {
        self.0.split("::").next().unwrap_or_default()
    }

    /// Everything after the first segment, or `None` for a bare package path.
    pub fn rest(&self) -> Option<&str> {
        self.0.split_once("::").map(|(_, rest)| rest)
    }

    /// Same path with the first segment replaced by `top_level`.
    pub fn with_top_level(&self, top_level: &str) -> ModulePath {
        match self.rest() {
            Some(rest) => ModulePath(format!("{top_level}::{rest}")),
            None => ModulePath(top_level.to_owned()),
        }
    }

    /// Child path `self::name`.
    pub fn join(&self, name: &str) -> ModulePath {
        ModulePath(format!("{}::{name}", self.0))
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ModulePath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ModulePath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Fully-qualified identity of a registered candidate type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(pub String);

impl CandidateId {
    /// Last path segment, e.g. `GitIgnore` for `rigger::dev::configs::GitIgnore`.
    pub fn short_name(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for CandidateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Metadata structs
// ---------------------------------------------------------------------------

/// One installed package as reported by the host packaging ecosystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: PackageName,
    /// Filesystem root of the package.
    pub root: PathBuf,
    /// Names of direct dependencies.
    #[serde(default)]
    pub dependencies: Vec<PackageName>,
    /// Minimum supported toolchain declared by the package, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rust_version: Option<String>,
}

impl Package {
    pub fn depends_on(&self, other: &PackageName) -> bool {
        self.dependencies.iter().any(|d| d == other)
    }
}

/// Read-only dependency metadata: the root package plus every installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIndex {
    pub root: PackageName,
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl PackageIndex {
    pub fn get(&self, name: &PackageName) -> Option<&Package> {
        self.packages.iter().find(|p| &p.name == name)
    }

    pub fn root_package(&self) -> Option<&Package> {
        self.get(&self.root)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
