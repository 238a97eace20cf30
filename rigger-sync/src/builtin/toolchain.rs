//! `rust-toolchain`: a single-value pin, always overwritten exactly.
//!
//! The pin comes from the `toolchain` key of `rigger.yaml`, else the root
//! package's `rust_version`, else `stable`.

use std::path::PathBuf;

use crate::entity::{ConfigEntity, ProjectContext};
use crate::error::ConvergeError;
use crate::merge::MergePolicy;
use crate::state::{Format, State};

use super::manifest::ProjectManifest;

pub const ID: &str = "rigger::dev::configs::ToolchainPin";
pub const DEFAULT_CHANNEL: &str = "stable";

#[derive(Debug, Default)]
pub struct ToolchainPin;

pub(crate) fn boxed() -> Box<dyn ConfigEntity> {
    Box::new(ToolchainPin)
}

impl ToolchainPin {
    /// The pinned toolchain for `ctx`.
    pub fn channel(ctx: &ProjectContext) -> Result<String, ConvergeError> {
        let manifest = ProjectManifest.load(ctx)?;
        let configured = manifest
            .as_map()
            .and_then(|map| map.get("toolchain"))
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(channel) = configured {
            return Ok(channel.to_string());
        }
        Ok(ctx
            .package
            .rust_version
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_CHANNEL)
            .to_string())
    }
}

impl ConfigEntity for ToolchainPin {
    fn relative_path(&self) -> PathBuf {
        PathBuf::from("rust-toolchain")
    }

    fn format(&self) -> Format {
        Format::Scalar
    }

    fn policy(&self) -> MergePolicy {
        MergePolicy::Replace
    }

    fn priority(&self) -> u32 {
        5
    }

    fn expected(&self, ctx: &ProjectContext) -> Result<State, ConvergeError> {
        Ok(State::Scalar(Self::channel(ctx)?))
    }
}
