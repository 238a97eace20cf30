//! `rigger build`: run every leaf builder and list the artifacts.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use rigger_build::{build_all, Artifact, BuildJob, BuildReport};

use crate::{project, Catalog, GlobalArgs};

/// Arguments for `rigger build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct BuilderJson<'a> {
    builder: String,
    artifacts: &'a [Artifact],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl BuildArgs {
    pub fn run(self, global: &GlobalArgs, catalog: &Catalog) -> Result<()> {
        let session = project::open_session(global)?;
        let leaves = session.resolve(&catalog.builders)?;
        let jobs = BuildJob::from_leaves(&leaves);
        let ctx = project::build_context(global, &session);

        let report = build_all(&jobs, &ctx);
        if self.json {
            print_json(&report)?;
        } else {
            print_report(&report);
        }

        let failed = report.failures().count();
        if failed > 0 {
            bail!("{failed} of {} builders failed", report.entries.len());
        }
        Ok(())
    }
}

fn print_json(report: &BuildReport) -> Result<()> {
    let payload: Vec<BuilderJson<'_>> = report
        .entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(artifacts) => BuilderJson {
                builder: entry.id.to_string(),
                artifacts,
                error: None,
            },
            Err(err) => BuilderJson {
                builder: entry.id.to_string(),
                artifacts: &[],
                error: Some(err.to_string()),
            },
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize build JSON")?
    );
    Ok(())
}

fn print_report(report: &BuildReport) {
    if report.entries.is_empty() {
        println!("No builders registered.");
        return;
    }
    for entry in &report.entries {
        match &entry.result {
            Ok(artifacts) => {
                println!("{} {}", "✓".green(), entry.id);
                for artifact in artifacts {
                    let digest = artifact.sha256.as_deref().unwrap_or("(directory)");
                    println!("  {}  {}", artifact.path.display(), digest.bright_black());
                }
            }
            Err(err) => println!("{} {}: {err}", "✗".red(), entry.id),
        }
    }
}
