//! `rigger.yaml`: project-level settings. rigger owns `name` and
//! `rigger_version`; every other key belongs to the user and survives
//! convergence.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::entity::{ConfigEntity, ProjectContext};
use crate::error::ConvergeError;
use crate::state::{Format, State};
use crate::ENGINE_VERSION;

pub const ID: &str = "rigger::dev::configs::ProjectManifest";
pub const FILE_NAME: &str = "rigger.yaml";

#[derive(Debug, Default)]
pub struct ProjectManifest;

pub(crate) fn boxed() -> Box<dyn ConfigEntity> {
    Box::new(ProjectManifest)
}

impl ConfigEntity for ProjectManifest {
    fn relative_path(&self) -> PathBuf {
        PathBuf::from(FILE_NAME)
    }

    fn format(&self) -> Format {
        Format::Yaml
    }

    fn priority(&self) -> u32 {
        10
    }

    fn expected(&self, ctx: &ProjectContext) -> Result<State, ConvergeError> {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(ctx.package.name.to_string()));
        map.insert("rigger_version".into(), Value::String(ENGINE_VERSION.into()));
        Ok(State::Map(map))
    }
}
