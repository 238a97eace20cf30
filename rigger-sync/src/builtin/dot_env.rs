//! `.env`: local secrets. The file is user-owned; rigger only makes sure it
//! exists and refuses to write any content into it.

use std::path::PathBuf;

use crate::entity::{ConfigEntity, ProjectContext};
use crate::error::{ConvergeError, DumpError};
use crate::merge::MergePolicy;
use crate::state::{Format, State};

pub const ID: &str = "rigger::dev::configs::DotEnv";

#[derive(Debug, Default)]
pub struct DotEnv;

pub(crate) fn boxed() -> Box<dyn ConfigEntity> {
    Box::new(DotEnv)
}

impl ConfigEntity for DotEnv {
    fn relative_path(&self) -> PathBuf {
        PathBuf::from(".env")
    }

    fn format(&self) -> Format {
        Format::Text
    }

    fn policy(&self) -> MergePolicy {
        MergePolicy::ExistenceOnly
    }

    fn expected(&self, _ctx: &ProjectContext) -> Result<State, ConvergeError> {
        Ok(State::Scalar(String::new()))
    }

    fn dump(&self, state: &State) -> Result<String, DumpError> {
        match state {
            State::Scalar(body) if body.is_empty() => Ok(String::new()),
            other => Err(DumpError::Refused(format!(
                "{} content for .env; the file is edited by hand",
                other.kind()
            ))),
        }
    }
}
