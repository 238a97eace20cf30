//! `rigger converge` / `rigger mkroot`: bring config files to their expected state.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use rigger_sync::{converge_all, ConvergeOptions, ConvergeReport, Managed, Outcome};

use crate::{project, Catalog, GlobalArgs};

/// Arguments for `rigger converge`.
#[derive(Args, Debug)]
pub struct ConvergeArgs {
    /// Show what would be written without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Only converge entities with a non-zero priority.
    #[arg(long)]
    pub priority: bool,
}

impl ConvergeArgs {
    pub fn run(self, global: &GlobalArgs, catalog: &Catalog) -> Result<()> {
        let session = project::open_session(global)?;
        let leaves = session.resolve(&catalog.configs)?;
        let managed = Managed::from_leaves(&leaves);
        let ctx = project::project_context(global, &session)?;

        let report = converge_all(
            &managed,
            &ctx,
            ConvergeOptions {
                dry_run: self.dry_run,
                priority_only: self.priority,
            },
        );
        print_report(&report, global, self.dry_run);

        let failed = report.failures().count();
        if failed > 0 {
            bail!("{failed} of {} config entities failed to converge", report.entries.len());
        }
        Ok(())
    }
}

fn print_report(report: &ConvergeReport, global: &GlobalArgs, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = report.count(Outcome::Written) + report.count(Outcome::WouldWrite);
    let unchanged = report.count(Outcome::Unchanged);

    if report.entries.is_empty() {
        println!("{prefix}nothing to converge");
        return;
    }
    println!("{prefix}converged ({written} written, {unchanged} unchanged)");

    for entry in &report.entries {
        let path = entry.path.strip_prefix(&global.root).unwrap_or(&entry.path);
        match &entry.result {
            Ok(Outcome::Written) => println!("  {}  {}", "✎".green(), path.display()),
            Ok(Outcome::WouldWrite) => println!("  {}  {}", "~".yellow(), path.display()),
            Ok(Outcome::Unchanged) => println!("  ·  {}", path.display()),
            Err(err) => println!("  {}  {}: {err}", "✗".red(), path.display()),
        }
    }
}
