//! `.gitignore`: GitHub's Rust template plus the entries rigger itself needs.
//! Lines the user added are never removed.

use std::path::PathBuf;

use rigger_templates::GITIGNORE_FALLBACK;

use crate::entity::{ConfigEntity, ProjectContext};
use crate::error::ConvergeError;
use crate::fetch::fetch_or_fallback;
use crate::state::{Format, State};

pub const ID: &str = "rigger::dev::configs::GitIgnore";

pub const TEMPLATE_URL: &str = "https://raw.githubusercontent.com/github/gitignore/main/Rust.gitignore";

const EXTRA_ENTRIES: &[&str] = &[
    "",
    "# editors",
    ".vscode/",
    ".idea/",
    "",
    "# rigger",
    "/dist/",
    "*.rigger.tmp",
    ".env",
];

#[derive(Debug, Default)]
pub struct GitIgnore;

pub(crate) fn boxed() -> Box<dyn ConfigEntity> {
    Box::new(GitIgnore)
}

impl ConfigEntity for GitIgnore {
    fn relative_path(&self) -> PathBuf {
        PathBuf::from(".gitignore")
    }

    fn format(&self) -> Format {
        Format::Lines
    }

    fn expected(&self, ctx: &ProjectContext) -> Result<State, ConvergeError> {
        let template = fetch_or_fallback(
            ctx.fetcher.as_ref(),
            TEMPLATE_URL,
            &ctx.resources,
            GITIGNORE_FALLBACK,
        )?;
        let lines = template
            .lines()
            .map(str::to_string)
            .chain(EXTRA_ENTRIES.iter().map(|entry| entry.to_string()));
        Ok(State::list(lines))
    }
}
