//! `rigger diff`: unified diffs of what converge would write.

use anyhow::{bail, Result};
use clap::Args;

use rigger_sync::{diff_all, Managed};

use crate::{project, Catalog, GlobalArgs};

/// Arguments for `rigger diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {}

impl DiffArgs {
    pub fn run(self, global: &GlobalArgs, catalog: &Catalog) -> Result<()> {
        let session = project::open_session(global)?;
        let leaves = session.resolve(&catalog.configs)?;
        let managed = Managed::from_leaves(&leaves);
        let ctx = project::project_context(global, &session)?;

        let report = diff_all(&managed, &ctx);
        if report.diffs.is_empty() && report.failures.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in &report.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        for (id, err) in &report.failures {
            eprintln!("{id}: {err}");
        }
        if !report.failures.is_empty() {
            bail!("{} config entities could not be diffed", report.failures.len());
        }
        Ok(())
    }
}
