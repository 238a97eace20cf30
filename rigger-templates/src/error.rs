//! Error types for rigger-templates.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from resource lookup and rendering.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error while loading project overrides.
    #[error("resource io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no bundled resource named '{0}'")]
    NotFound(String),
}
