//! Error types for rigger-sync.

use std::path::PathBuf;

use thiserror::Error;

use rigger_templates::ResourceError;

use crate::state::Format;

/// A state could not be serialised into the entity's artifact.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DumpError {
    /// The state's shape does not fit the declared format.
    #[error("cannot write {found} state as {format}")]
    Shape { format: Format, found: &'static str },

    /// The entity refused the content before writing.
    #[error("refused to write: {0}")]
    Refused(String),

    #[error("serialization failed: {0}")]
    Encode(String),

    /// A list item would be split across lines on the next load.
    #[error("list item {0:?} contains a line break")]
    LineBreak(String),

    /// The encoded text reads back as a different state.
    #[error("{format} encoding does not read back as the state being written")]
    Unstable { format: Format },
}

/// Failure converging a single config entity.
#[derive(Debug, Error)]
pub enum ConvergeError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Present content exists but cannot be decoded.
    #[error("cannot load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("cannot write {path}: {source}")]
    Dump {
        path: PathBuf,
        #[source]
        source: DumpError,
    },

    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Two or more leaf entities manage the same artifact.
    #[error("{path} is managed by more than one entity: {}", owners.join(", "))]
    Conflict { path: PathBuf, owners: Vec<String> },

    /// Written content still does not satisfy the entity.
    #[error("{path} is still unsatisfied after writing")]
    NotSatisfied { path: PathBuf },
}

/// Remote fetch failure. Always recovered through a bundled fallback.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network disabled")]
    Offline,

    #[error("request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("reading response body failed: {0}")]
    Body(#[from] std::io::Error),
}

/// Convenience constructor for [`ConvergeError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConvergeError {
    ConvergeError::Io {
        path: path.into(),
        source,
    }
}
