//! Error types for rigger-build.

use std::path::PathBuf;

use thiserror::Error;

/// Error type a creation hook may return.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single builder. Never aborts sibling builders.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The builder's artifact-creation hook failed.
    #[error("builder {builder} failed: {source}")]
    Hook {
        builder: String,
        #[source]
        source: HookError,
    },

    #[error("builder {builder} produced no artifacts")]
    NoArtifacts { builder: String },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`BuildError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}
