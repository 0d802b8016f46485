//! Error types for uerun-automation

use std::path::PathBuf;
use thiserror::Error;
use uerun_core::UnresolvedReason;

/// Errors that stop a test run before or while it executes.
#[derive(Error, Debug)]
pub enum AutomationError {
    /// Resolution selected no installation
    #[error("cannot run tests: {0}")]
    Unresolved(UnresolvedReason),

    /// Selected engine has no headless editor binary
    #[error("engine {version} at {} has no headless editor binary", root.display())]
    MissingTestRunner { version: String, root: PathBuf },

    /// The child process could not be started
    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error while reading the child's output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for uerun-automation operations.
pub type Result<T> = std::result::Result<T, AutomationError>;
