//! # rigger-sync
//!
//! Convergence engine for declaratively managed project artifacts.
//!
//! Each [`ConfigEntity`] owns one file. [`converge_all`] drives every leaf
//! entity towards its expected state without discarding user content:
//! lists are unioned, maps overlaid, pins replaced, and user-owned files only
//! created when missing. Writes are atomic whole-file replacements.

pub mod builtin;
pub mod converge;
pub mod diff;
pub mod entity;
pub mod error;
pub mod fetch;
pub mod merge;
pub mod state;
pub mod writer;

pub use builtin::{config_point, CONFIGS_MODULE};
pub use converge::{converge, converge_all, status_all, ConvergeOptions, ConvergeReport, Outcome};
pub use diff::{diff_all, DiffReport, FileDiff};
pub use entity::{ConfigEntity, Managed, ProjectContext};
pub use error::{ConvergeError, DumpError, FetchError};
pub use fetch::{Fetch, HttpFetcher, OfflineFetcher};
pub use merge::MergePolicy;
pub use state::{Format, State};

/// Version stamped into generated artifacts.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
