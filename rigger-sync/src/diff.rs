//! Unified diff of pending convergence for `rigger diff`. Nothing is written.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use rigger_core::CandidateId;

use crate::{
    converge::conflicts,
    entity::{ConfigEntity, Managed, ProjectContext},
    error::{io_err, ConvergeError},
};

/// A single artifact diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub id: CandidateId,
    pub path: PathBuf,
    pub unified_diff: String,
}

#[derive(Debug, Default)]
pub struct DiffReport {
    pub diffs: Vec<FileDiff>,
    pub failures: Vec<(CandidateId, ConvergeError)>,
}

/// Diff between current artifact text and the converged target, or `None`
/// when converging would not write.
pub fn diff_entity(entity: &dyn ConfigEntity, ctx: &ProjectContext) -> Result<Option<String>, ConvergeError> {
    let path = entity.path(ctx);
    let present = entity.load(ctx)?;
    let expected = entity.expected(ctx)?;
    let target = entity.target(&present, &expected);
    if target == present {
        return Ok(None);
    }

    let rendered = entity
        .dump(&target)
        .map_err(|source| ConvergeError::Dump {
            path: path.clone(),
            source,
        })?;
    let existing = read_existing_or_empty(&path)?;

    let relative = path.strip_prefix(&ctx.root).unwrap_or(path.as_path());
    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(&existing, &normalize_line_endings(&rendered))
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();
    Ok(Some(unified))
}

/// Diff every leaf entity in order.
pub fn diff_all(managed: &[Managed], ctx: &ProjectContext) -> DiffReport {
    let selected: Vec<&Managed> = managed.iter().collect();
    let conflicting = conflicts(&selected, ctx);
    let mut report = DiffReport::default();

    for m in selected {
        let path = m.entity.path(ctx);
        if let Some(owners) = conflicting.get(&path) {
            report.failures.push((
                m.id.clone(),
                ConvergeError::Conflict {
                    path,
                    owners: owners.clone(),
                },
            ));
            continue;
        }
        match diff_entity(m.entity.as_ref(), ctx) {
            Ok(Some(unified_diff)) => report.diffs.push(FileDiff {
                id: m.id.clone(),
                path,
                unified_diff,
            }),
            Ok(None) => {}
            Err(err) => report.failures.push((m.id.clone(), err)),
        }
    }
    report
}

fn read_existing_or_empty(path: &Path) -> Result<String, ConvergeError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
