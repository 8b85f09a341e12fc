//! Error taxonomy for the scaffolding workflow
//!
//! Only conditions that abort a run live here. Degradable conditions (a
//! missing runtime the user declined to install, an unsupported package
//! manager) are reported as warnings by the workflow and never become
//! errors. The product binary is the single place an error turns into a
//! process exit.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The target directory already contains files. Scaffolding never
    /// merges into a populated directory.
    #[error("target directory `{}` is not empty", .path.display())]
    InvalidTarget { path: PathBuf },

    /// The requested template key is not in the registry. The prompt layer
    /// only offers registry keys, so this guards direct API callers.
    #[error("unknown template `{key}`")]
    UnknownTemplate { key: String },

    /// The remote template could not be retrieved. There is no retry
    /// policy; the user re-invokes after fixing the cause.
    #[error("failed to fetch template: {reason}")]
    FetchFailed { reason: String },

    /// A substitution file exists but could not be read or rewritten.
    /// Indicates a corrupted fetch, so the run stops.
    #[error("failed to rewrite `{}`: {source}", .path.display())]
    Substitution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template declares a parameter the request did not supply. The
    /// prompt layer always collects declared parameters first.
    #[error("no value provided for template parameter `{name}`")]
    MissingParameter { name: String },

    /// The user interrupted an interactive step. No cleanup is performed.
    #[error("setup cancelled")]
    Aborted,
}
