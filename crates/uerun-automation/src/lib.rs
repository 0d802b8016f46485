//! uerun-automation: headless automation test runs.
//!
//! Composes the editor command line for a detected project, runs it, and
//! interprets the merged output stream into test events and a final
//! outcome.

pub mod command;
pub mod error;
pub mod interpreter;
pub mod runner;

pub use command::{TestCommand, HEADLESS_FLAGS};
pub use error::{AutomationError, Result};
pub use interpreter::{
    classify_line, DiagnosticLevel, LogInterpreter, RunEvent, RunOutcome, RunState, RunSummary,
};
pub use runner::AutomationRunner;
