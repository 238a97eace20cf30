//! `README.md`: makes sure the rendered header lines are present. Everything
//! else in the file is left to the user.

use std::path::PathBuf;

use serde::Serialize;

use rigger_templates::README_TEMPLATE;

use crate::entity::{ConfigEntity, ProjectContext};
use crate::error::ConvergeError;
use crate::state::{Format, State};
use crate::ENGINE_VERSION;

pub const ID: &str = "rigger::dev::configs::Readme";

#[derive(Debug, Default)]
pub struct Readme;

pub(crate) fn boxed() -> Box<dyn ConfigEntity> {
    Box::new(Readme)
}

#[derive(Serialize)]
struct ReadmeContext<'a> {
    name: &'a str,
    engine_version: &'a str,
}

impl ConfigEntity for Readme {
    fn relative_path(&self) -> PathBuf {
        PathBuf::from("README.md")
    }

    fn format(&self) -> Format {
        Format::Lines
    }

    fn expected(&self, ctx: &ProjectContext) -> Result<State, ConvergeError> {
        let rendered = ctx.resources.render(
            README_TEMPLATE,
            &ReadmeContext {
                name: &ctx.package.name.0,
                engine_version: ENGINE_VERSION,
            },
        )?;
        Ok(State::list(rendered.lines()))
    }
}
