//! Per-invocation project loading shared by the subcommands.

use anyhow::{Context, Result};

use rigger_build::BuildContext;
use rigger_core::{metadata, Session};
use rigger_sync::{Fetch, HttpFetcher, OfflineFetcher, ProjectContext};
use rigger_templates::Resources;

use crate::GlobalArgs;

/// Load dependency metadata and open a session on it.
pub fn open_session(global: &GlobalArgs) -> Result<Session> {
    let index = match &global.metadata {
        Some(path) => metadata::load_index_at(path)
            .with_context(|| format!("failed to load package index {}", path.display()))?,
        None => metadata::cargo_metadata_at(&global.root)
            .with_context(|| format!("failed to read cargo metadata in {}", global.root.display()))?,
    };
    tracing::debug!(root = %index.root, packages = index.packages.len(), "package index loaded");
    Ok(Session::new(index))
}

/// Context the config entities compute expected state from.
pub fn project_context(global: &GlobalArgs, session: &Session) -> Result<ProjectContext> {
    let package = session.root_package()?.clone();
    let resources = Resources::for_project(&global.root).context("failed to load templates")?;
    let fetcher: Box<dyn Fetch> = if global.offline {
        Box::new(OfflineFetcher)
    } else {
        Box::new(HttpFetcher::new())
    };
    Ok(ProjectContext::new(&global.root, package, resources, fetcher))
}

pub fn build_context(global: &GlobalArgs, session: &Session) -> BuildContext {
    BuildContext::new(&global.root, session.root().clone())
}
