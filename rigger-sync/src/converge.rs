//! Convergence engine.
//!
//! Per entity: load present state, compute expected state, merge, and write
//! only when the merged target differs structurally from what is on disk.
//! Content that would not load back as the target is refused before writing.
//! [`converge_all`] runs every leaf entity in resolver order, isolating
//! failures so one broken entity never stops its siblings.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use rigger_core::CandidateId;

use crate::entity::{ConfigEntity, Managed, ProjectContext};
use crate::error::{ConvergeError, DumpError};
use crate::state::State;
use crate::writer::atomic_write;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of converging one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Merged target equals present state; nothing written.
    Unchanged,
    /// The artifact was replaced.
    Written,
    /// `--dry-run`: the artifact *would* have been written.
    WouldWrite,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Unchanged => "unchanged",
            Outcome::Written => "written",
            Outcome::WouldWrite => "would write",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvergeOptions {
    pub dry_run: bool,
    /// Only entities with a non-zero priority.
    pub priority_only: bool,
}

// ---------------------------------------------------------------------------
// Single entity
// ---------------------------------------------------------------------------

/// Drive one entity's artifact to its target state.
pub fn converge(
    entity: &dyn ConfigEntity,
    ctx: &ProjectContext,
    dry_run: bool,
) -> Result<Outcome, ConvergeError> {
    let path = entity.path(ctx);
    let present = entity.load(ctx)?;
    let expected = entity.expected(ctx)?;
    let target = entity.target(&present, &expected);

    if target == present {
        tracing::debug!(path = %path.display(), "unchanged");
        return Ok(Outcome::Unchanged);
    }

    let content = entity
        .dump(&target)
        .and_then(|content| round_trip(entity, content, &target))
        .map_err(|source| ConvergeError::Dump {
            path: path.clone(),
            source,
        })?;

    if dry_run {
        tracing::info!(path = %path.display(), "[dry-run] would write");
        return Ok(Outcome::WouldWrite);
    }

    atomic_write(&path, &content)?;

    // Checked against the target already computed; `expected` may hit the network.
    if entity.load(ctx)? != target {
        return Err(ConvergeError::NotSatisfied { path });
    }
    tracing::info!(path = %path.display(), "wrote");
    Ok(Outcome::Written)
}

/// Refuse content that would not load back as `target`; writing it would
/// make every later run write again.
fn round_trip(entity: &dyn ConfigEntity, content: String, target: &State) -> Result<String, DumpError> {
    let format = entity.format();
    match format.decode(&content) {
        Ok(decoded) if &decoded == target => Ok(content),
        _ => Err(DumpError::Unstable { format }),
    }
}

// ---------------------------------------------------------------------------
// Session report
// ---------------------------------------------------------------------------

/// Per-entity line of a [`ConvergeReport`].
#[derive(Debug)]
pub struct EntityReport {
    pub id: CandidateId,
    pub path: PathBuf,
    pub result: Result<Outcome, ConvergeError>,
}

/// Everything a convergence session did, in execution order.
#[derive(Debug, Default)]
pub struct ConvergeReport {
    pub entries: Vec<EntityReport>,
}

impl ConvergeReport {
    pub fn failures(&self) -> impl Iterator<Item = (&EntityReport, &ConvergeError)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().err().map(|err| (entry, err)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.result, Ok(o) if o == outcome))
            .count()
    }
}

/// Entities selected by `options`, in resolver order.
pub fn select<'m>(managed: &'m [Managed], options: &ConvergeOptions) -> Vec<&'m Managed> {
    managed
        .iter()
        .filter(|m| !options.priority_only || m.entity.priority() > 0)
        .collect()
}

/// Artifact paths claimed by more than one entity, with their owners.
pub fn conflicts(selected: &[&Managed], ctx: &ProjectContext) -> BTreeMap<PathBuf, Vec<String>> {
    let mut owners: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
    for m in selected {
        owners
            .entry(m.entity.path(ctx))
            .or_default()
            .push(m.id.to_string());
    }
    owners.retain(|_, ids| ids.len() > 1);
    owners
}

/// Converge every selected entity in order.
///
/// Conflicting writers fail individually; per-entity errors are collected,
/// never propagated.
pub fn converge_all(managed: &[Managed], ctx: &ProjectContext, options: ConvergeOptions) -> ConvergeReport {
    let selected = select(managed, &options);
    let conflicting = conflicts(&selected, ctx);
    let mut report = ConvergeReport::default();

    for m in selected {
        let path = m.entity.path(ctx);
        let result = match conflicting.get(&path) {
            Some(owners) => Err(ConvergeError::Conflict {
                path: path.clone(),
                owners: owners.clone(),
            }),
            None => converge(m.entity.as_ref(), ctx, options.dry_run),
        };
        if let Err(error) = &result {
            tracing::warn!(entity = %m.id, %error, "convergence failed");
        }
        report.entries.push(EntityReport {
            id: m.id.clone(),
            path,
            result,
        });
    }
    report
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Satisfaction of one entity, without writing.
#[derive(Debug)]
pub struct StatusEntry {
    pub id: CandidateId,
    pub path: PathBuf,
    pub priority: u32,
    pub satisfied: Result<bool, ConvergeError>,
}

pub fn status_all(managed: &[Managed], ctx: &ProjectContext) -> Vec<StatusEntry> {
    let selected: Vec<&Managed> = managed.iter().collect();
    let conflicting = conflicts(&selected, ctx);

    selected
        .into_iter()
        .map(|m| {
            let path = m.entity.path(ctx);
            let satisfied = match conflicting.get(&path) {
                Some(owners) => Err(ConvergeError::Conflict {
                    path: path.clone(),
                    owners: owners.clone(),
                }),
                None => m.entity.is_satisfied(ctx),
            };
            StatusEntry {
                id: m.id.clone(),
                path,
                priority: m.entity.priority(),
                satisfied,
            }
        })
        .collect()
}
