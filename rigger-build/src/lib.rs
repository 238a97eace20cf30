//! # rigger-build
//!
//! Builder lifecycle: every leaf [`Builder`] writes into its own scratch
//! directory, and whatever it leaves there is renamed with the host platform
//! suffix and moved into `dist/`. Failures are collected per builder.

pub mod builder;
pub mod error;
pub mod platform;
pub mod relocate;

pub use builder::{
    build, build_all, builder_point, Artifact, BuildContext, BuildJob, BuildReport, Builder,
    BUILDERS_MODULE,
};
pub use error::{BuildError, HookError};
