//! `rigger status`: is every managed config file satisfied?

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use rigger_sync::{converge::status_all, Managed};

use crate::{project, Catalog, GlobalArgs};

/// Arguments for `rigger status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct EntityStatusJson {
    entity: String,
    path: String,
    priority: u32,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "entity")]
    entity: String,
    #[tabled(rename = "path")]
    path: String,
    #[tabled(rename = "priority")]
    priority: u32,
    #[tabled(rename = "status")]
    status: String,
}

impl StatusArgs {
    pub fn run(self, global: &GlobalArgs, catalog: &Catalog) -> Result<()> {
        let session = project::open_session(global)?;
        let leaves = session.resolve(&catalog.configs)?;
        let managed = Managed::from_leaves(&leaves);
        let ctx = project::project_context(global, &session)?;

        let rows: Vec<EntityStatusJson> = status_all(&managed, &ctx)
            .into_iter()
            .map(|entry| {
                let path = entry.path.strip_prefix(&global.root).unwrap_or(&entry.path);
                let (status, error) = match entry.satisfied {
                    Ok(true) => ("satisfied", None),
                    Ok(false) => ("pending", None),
                    Err(err) => ("error", Some(err.to_string())),
                };
                EntityStatusJson {
                    entity: entry.id.to_string(),
                    path: path.display().to_string(),
                    priority: entry.priority,
                    status,
                    error,
                }
            })
            .collect();
        let errors = rows.iter().filter(|row| row.error.is_some()).count();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize status JSON")?
            );
        } else {
            print_table(&rows);
        }

        if errors > 0 {
            bail!("{errors} config entities could not be checked");
        }
        Ok(())
    }
}

fn print_table(rows: &[EntityStatusJson]) {
    let pending = rows.iter().filter(|row| row.status != "satisfied").count();
    println!(
        "rigger v{} | {} entities | {} pending",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        pending,
    );
    if rows.is_empty() {
        return;
    }

    let table_rows: Vec<StatusTableRow> = rows
        .iter()
        .map(|row| StatusTableRow {
            entity: row.entity.rsplit("::").next().unwrap_or(&row.entity).to_string(),
            path: row.path.clone(),
            priority: row.priority,
            status: status_label(row),
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if pending > 0 {
        println!("Run 'rigger converge' to update pending files.");
    }
}

fn status_label(row: &EntityStatusJson) -> String {
    match (row.status, &row.error) {
        ("satisfied", _) => "✓ satisfied".green().to_string(),
        ("pending", _) => "~ pending".yellow().to_string(),
        (_, Some(err)) => format!("✗ {err}").as_str().red().to_string(),
        (other, None) => other.to_string(),
    }
}
