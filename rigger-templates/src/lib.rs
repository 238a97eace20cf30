//! # rigger-templates
//!
//! Bundled text resources used by the builtin config entities, with
//! per-project overrides read from `.rigger/templates/`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rigger_templates::{Resources, README_TEMPLATE};
//! use std::path::Path;
//!
//! fn readme(root: &Path) -> Option<String> {
//!     let res = Resources::for_project(root).ok()?;
//!     res.render(README_TEMPLATE, &serde_json::json!({
//!         "name": "demo",
//!         "engine_version": "0.1.0",
//!     }))
//!     .ok()
//! }
//! ```

pub mod error;
pub mod resources;

pub use error::ResourceError;
pub use resources::{Resources, GITIGNORE_FALLBACK, OVERRIDE_DIR, README_TEMPLATE};
