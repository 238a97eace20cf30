//! Builder lifecycle.
//!
//! 1. Create a scratch directory (removed on every exit path).
//! 2. Run the builder's creation hook inside it.
//! 3. Enumerate the top-level entries it wrote; none is an error.
//! 4. Append the platform suffix to each name.
//! 5. Move each into the builder's artifacts directory and digest it.

use std::path::{Path, PathBuf};

use serde::Serialize;

use rigger_core::{Candidate, CandidateId, ExtensionPoint, PackageName, BASE_PACKAGE};

use crate::error::{io_err, BuildError, HookError};
use crate::platform::{host_platform, suffixed_name};
use crate::relocate::{digest, relocate};

/// Canonical module path of the builder extension point.
pub const BUILDERS_MODULE: &str = "rigger::dev::builders";

/// Default artifacts directory, relative to the project root.
pub const DEFAULT_ARTIFACTS_DIR: &str = "dist";

// ---------------------------------------------------------------------------
// Context and trait
// ---------------------------------------------------------------------------

/// Project data handed to every builder in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub root: PathBuf,
    pub package: PackageName,
    /// Suffix label, `Linux` / `Windows` / `Darwin` on the common hosts.
    pub platform: String,
}

impl BuildContext {
    pub fn new(root: impl Into<PathBuf>, package: PackageName) -> Self {
        Self {
            root: root.into(),
            package,
            platform: host_platform(),
        }
    }
}

/// A production rule for one or more output artifacts.
pub trait Builder {
    /// Write artifacts into `scratch`. Anything left there is collected.
    fn create_artifacts(&self, scratch: &Path, ctx: &BuildContext) -> Result<(), HookError>;

    /// Final directory; relative paths are resolved against the project root.
    fn artifacts_dir(&self) -> PathBuf {
        PathBuf::from(DEFAULT_ARTIFACTS_DIR)
    }

    fn app_name(&self, ctx: &BuildContext) -> String {
        ctx.package.0.clone()
    }
}

/// Extension point for builders. The base package ships none.
pub fn builder_point() -> ExtensionPoint<dyn Builder> {
    let mut point = ExtensionPoint::new(BUILDERS_MODULE);
    point.module_for(BASE_PACKAGE);
    point
}

// ---------------------------------------------------------------------------
// Single builder
// ---------------------------------------------------------------------------

/// One relocated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub path: PathBuf,
    /// Hex SHA-256; absent for directory artifacts.
    pub sha256: Option<String>,
}

/// Run the full lifecycle for `builder`, labelled `name` in errors.
pub fn build(name: &str, builder: &dyn Builder, ctx: &BuildContext) -> Result<Vec<Artifact>, BuildError> {
    let scratch = tempfile::Builder::new()
        .prefix("rigger-build-")
        .tempdir()
        .map_err(|e| io_err(std::env::temp_dir(), e))?;

    builder
        .create_artifacts(scratch.path(), ctx)
        .map_err(|source| BuildError::Hook {
            builder: name.to_string(),
            source,
        })?;

    let mut produced = Vec::new();
    for entry in std::fs::read_dir(scratch.path()).map_err(|e| io_err(scratch.path(), e))? {
        let entry = entry.map_err(|e| io_err(scratch.path(), e))?;
        produced.push(entry.path());
    }
    produced.sort();
    if produced.is_empty() {
        return Err(BuildError::NoArtifacts {
            builder: name.to_string(),
        });
    }

    let dist = ctx.root.join(builder.artifacts_dir());
    std::fs::create_dir_all(&dist).map_err(|e| io_err(&dist, e))?;

    let mut artifacts = Vec::with_capacity(produced.len());
    for from in produced {
        let Some(file_name) = from.file_name() else {
            continue;
        };
        let to = dist.join(suffixed_name(file_name, &ctx.platform));
        relocate(&from, &to)?;
        let sha256 = digest(&to)?;
        tracing::info!(builder = name, path = %to.display(), "artifact");
        artifacts.push(Artifact { path: to, sha256 });
    }
    Ok(artifacts)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A resolved leaf builder with the identity it was registered under.
pub struct BuildJob {
    pub id: CandidateId,
    pub builder: Box<dyn Builder>,
}

impl BuildJob {
    pub fn new(id: impl Into<CandidateId>, builder: Box<dyn Builder>) -> Self {
        Self {
            id: id.into(),
            builder,
        }
    }

    /// Instantiate resolved leaves, keeping their order.
    pub fn from_leaves(leaves: &[&Candidate<dyn Builder>]) -> Vec<BuildJob> {
        leaves
            .iter()
            .filter_map(|candidate| {
                candidate
                    .instantiate()
                    .map(|builder| BuildJob::new(candidate.id.clone(), builder))
            })
            .collect()
    }
}

impl std::fmt::Debug for BuildJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildJob").field("id", &self.id).finish()
    }
}

#[derive(Debug)]
pub struct BuildEntry {
    pub id: CandidateId,
    pub result: Result<Vec<Artifact>, BuildError>,
}

/// Outcome of every builder in a session, in execution order.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub entries: Vec<BuildEntry>,
}

impl BuildReport {
    pub fn failures(&self) -> impl Iterator<Item = (&CandidateId, &BuildError)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().err().map(|err| (&entry.id, err)))
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().ok())
            .flatten()
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Run every job; a failing builder is recorded and the next one still runs.
pub fn build_all(jobs: &[BuildJob], ctx: &BuildContext) -> BuildReport {
    let mut report = BuildReport::default();
    for job in jobs {
        let result = build(&job.id.0, job.builder.as_ref(), ctx);
        if let Err(error) = &result {
            tracing::warn!(builder = %job.id, %error, "build failed");
        }
        report.entries.push(BuildEntry {
            id: job.id.clone(),
            result,
        });
    }
    report
}
