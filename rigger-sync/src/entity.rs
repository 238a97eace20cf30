//! The [`ConfigEntity`] boundary and the project data it is computed from.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rigger_core::{Candidate, CandidateId, Package};
use rigger_templates::Resources;

use crate::error::{io_err, ConvergeError, DumpError};
use crate::fetch::Fetch;
use crate::merge::MergePolicy;
use crate::state::{Format, State};

/// Live project data shared by every entity in one session.
pub struct ProjectContext {
    /// Directory artifacts are resolved against.
    pub root: PathBuf,
    /// The root package being driven.
    pub package: Package,
    pub resources: Resources,
    pub fetcher: Box<dyn Fetch>,
}

impl ProjectContext {
    pub fn new(root: impl Into<PathBuf>, package: Package, resources: Resources, fetcher: Box<dyn Fetch>) -> Self {
        Self {
            root: root.into(),
            package,
            resources,
            fetcher,
        }
    }
}

/// One declaratively managed artifact.
///
/// Implementors supply the path, format and expected state; loading,
/// merging, serialising and the satisfaction check have defaults driven by
/// [`ConfigEntity::format`] and [`ConfigEntity::policy`].
pub trait ConfigEntity {
    /// Artifact path relative to the project root.
    fn relative_path(&self) -> PathBuf;

    fn format(&self) -> Format;

    /// State computed from live project data, independent of what is on disk.
    fn expected(&self, ctx: &ProjectContext) -> Result<State, ConvergeError>;

    fn policy(&self) -> MergePolicy {
        match self.format() {
            Format::Lines => MergePolicy::Union,
            Format::Json | Format::Yaml => MergePolicy::Overlay,
            Format::Scalar | Format::Text => MergePolicy::Replace,
        }
    }

    /// Entities with a higher priority are the ones `--priority` selects.
    fn priority(&self) -> u32 {
        0
    }

    fn path(&self, ctx: &ProjectContext) -> PathBuf {
        ctx.root.join(self.relative_path())
    }

    /// Present state. A missing artifact is [`State::Absent`], never an error.
    fn load(&self, ctx: &ProjectContext) -> Result<State, ConvergeError> {
        load_state(&self.path(ctx), self.format())
    }

    /// Serialise `state` for writing. Override to enforce preconditions.
    fn dump(&self, state: &State) -> Result<String, DumpError> {
        self.format().encode(state)
    }

    /// Merge present and expected state under this entity's policy.
    fn target(&self, present: &State, expected: &State) -> State {
        self.policy().merge(present, expected)
    }

    /// True when converging would not write.
    fn is_satisfied(&self, ctx: &ProjectContext) -> Result<bool, ConvergeError> {
        let present = self.load(ctx)?;
        if self.policy() == MergePolicy::ExistenceOnly {
            return Ok(!present.is_absent());
        }
        let expected = self.expected(ctx)?;
        Ok(self.target(&present, &expected) == present)
    }
}

/// Read and decode an artifact; a missing file is [`State::Absent`].
pub fn load_state(path: &Path, format: Format) -> Result<State, ConvergeError> {
    match std::fs::read_to_string(path) {
        Ok(text) => format.decode(&text).map_err(|reason| ConvergeError::Load {
            path: path.to_path_buf(),
            reason,
        }),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(State::Absent),
        Err(err) => Err(io_err(path, err)),
    }
}

/// A resolved leaf entity together with the identity it was registered under.
pub struct Managed {
    pub id: CandidateId,
    pub entity: Box<dyn ConfigEntity>,
}

impl Managed {
    pub fn new(id: impl Into<CandidateId>, entity: Box<dyn ConfigEntity>) -> Self {
        Self { id: id.into(), entity }
    }

    /// Instantiate resolved leaves, keeping their order.
    pub fn from_leaves(leaves: &[&Candidate<dyn ConfigEntity>]) -> Vec<Managed> {
        leaves
            .iter()
            .filter_map(|candidate| {
                candidate
                    .instantiate()
                    .map(|entity| Managed::new(candidate.id.clone(), entity))
            })
            .collect()
    }
}

impl std::fmt::Debug for Managed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Managed")
            .field("id", &self.id)
            .field("path", &self.entity.relative_path())
            .finish()
    }
}
