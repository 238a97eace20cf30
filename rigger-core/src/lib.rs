//! rigger core library: package metadata, discovery and leaf resolution.
//!
//! Public API surface:
//! - [`types`]: newtypes and metadata structs
//! - [`error`]: [`GraphError`], [`LocateError`], [`MetadataError`]
//! - [`metadata`]: YAML package index and `cargo metadata` loading
//! - [`graph`]: dependency graph walker
//! - [`locator`]: conventional module lookup per package
//! - [`extension`]: static registry of candidate implementations
//! - [`resolver`]: leaf resolution over `replaces` chains
//! - [`session`]: per-invocation context

pub mod error;
pub mod extension;
pub mod graph;
pub mod locator;
pub mod metadata;
pub mod resolver;
pub mod session;
pub mod types;

pub use error::{GraphError, LocateError, MetadataError};
pub use extension::{Candidate, ExtensionModule, ExtensionPoint};
pub use session::{Session, BASE_PACKAGE};
pub use types::{CandidateId, ModulePath, Package, PackageIndex, PackageName};
