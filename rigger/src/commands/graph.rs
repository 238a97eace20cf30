//! `rigger graph`: walked packages, base first, root last.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::{project, GlobalArgs};

/// Arguments for `rigger graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {}

impl GraphArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let session = project::open_session(global)?;
        for package in session.packages()? {
            if &package.name == session.root() {
                println!("{} {}", package.name, "(root)".bright_black());
            } else {
                println!("{}", package.name);
            }
        }
        Ok(())
    }
}
