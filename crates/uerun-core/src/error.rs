//! Error types for uerun-core

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by project inspection.
///
/// Discovery sources never produce these: a missing launcher tree, registry
/// key or engine directory is a normal empty result.
#[derive(Error, Debug)]
pub enum UeError {
    /// No `.uproject` file at or above the searched path
    #[error("no .uproject file found (searched {})", searched.display())]
    ManifestNotFound { searched: PathBuf },

    /// The given project path does not exist or cannot be resolved
    #[error("invalid project path {}: {source}", path.display())]
    InvalidProjectPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or has the wrong shape
    #[error("failed to parse {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for uerun-core operations.
pub type Result<T> = std::result::Result<T, UeError>;
