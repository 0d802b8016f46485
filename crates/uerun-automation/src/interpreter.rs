//! Automation log interpreter.
//!
//! [`classify_line`] turns one line of editor output into a [`RunEvent`];
//! [`LogInterpreter`] folds those events into run status one line at a
//! time, so memory use does not grow with the length of the log.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const NO_MATCH_MARKER: &str = "No automation tests matched";
const FOUND_PREFIX: &str = "Found";
const FOUND_MARKER: &str = "automation tests based on";
const TEST_STARTED_MARKER: &str = "Test Started.";
const TEST_COMPLETED_MARKER: &str = "Test Completed.";
const ERROR_MARKER: &str = "LogAutomation: Error:";
const WARNING_MARKER: &str = "LogAutomation: Warning:";

/// Separates the log category and verbosity from the message.
const DISPLAY_DELIMITER: &str = "Display: ";

fn found_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Found\s+(\d+)\s+automation tests based on").expect("valid regex")
    })
}

fn field_re(field: &'static str) -> Regex {
    Regex::new(&format!(r"{field}=\{{([^}}]*)\}}")).expect("valid regex")
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| field_re("Name"))
}

fn result_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| field_re("Result"))
}

/// Severity of an automation diagnostic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

/// What one line of output means.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    /// The runner reported tests matching the filter. `count` is `None`
    /// when the number could not be read from the line.
    Discovered { count: Option<u32>, text: String },

    TestStarted { name: String, fragment: String },

    TestCompleted {
        name: String,
        success: bool,
        fragment: String,
    },

    Diagnostic { level: DiagnosticLevel, text: String },

    /// Nothing matched the filter.
    NoMatch { filter: String },

    /// Anything else; not part of the readable summary.
    Unclassified { line: String },
}

impl RunEvent {
    /// Text to show for this event, `None` for unclassified lines.
    pub fn readable(&self) -> Option<String> {
        match self {
            RunEvent::Discovered { text, .. } => Some(text.clone()),
            RunEvent::TestStarted { fragment, .. } | RunEvent::TestCompleted { fragment, .. } => {
                Some(fragment.clone())
            }
            RunEvent::Diagnostic { text, .. } => Some(text.clone()),
            RunEvent::NoMatch { filter } => {
                Some(format!("ERROR: No tests matched filter '{filter}'"))
            }
            RunEvent::Unclassified { .. } => None,
        }
    }
}

/// Classify one line of editor output.
///
/// `filter` is the test filter the run was started with, reported back in
/// [`RunEvent::NoMatch`].
pub fn classify_line(line: &str, filter: &str) -> RunEvent {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.contains(NO_MATCH_MARKER) {
        return RunEvent::NoMatch {
            filter: filter.to_string(),
        };
    }

    if line.contains(FOUND_PREFIX) && line.contains(FOUND_MARKER) {
        let count = found_count_re()
            .captures(line)
            .and_then(|caps| caps[1].parse().ok());
        return RunEvent::Discovered {
            count,
            text: line.trim().to_string(),
        };
    }

    let started = line.contains(TEST_STARTED_MARKER);
    if started || line.contains(TEST_COMPLETED_MARKER) {
        let fragment = trailing_fragment(line);
        let name = capture(name_re(), line).unwrap_or_else(|| fragment.clone());
        return if started {
            RunEvent::TestStarted { name, fragment }
        } else {
            let success = capture(result_re(), line)
                .map(|r| r.eq_ignore_ascii_case("success") || r.eq_ignore_ascii_case("passed"))
                .unwrap_or(false);
            RunEvent::TestCompleted {
                name,
                success,
                fragment,
            }
        };
    }

    let level = if line.contains(ERROR_MARKER) {
        Some(DiagnosticLevel::Error)
    } else if line.contains(WARNING_MARKER) {
        Some(DiagnosticLevel::Warning)
    } else {
        None
    };
    if let Some(level) = level {
        return RunEvent::Diagnostic {
            level,
            text: line.trim().to_string(),
        };
    }

    RunEvent::Unclassified {
        line: line.to_string(),
    }
}

/// Message after the `Display: ` delimiter, or the whole line without one.
fn trailing_fragment(line: &str) -> String {
    line.split_once(DISPLAY_DELIMITER)
        .map_or(line, |(_, rest)| rest)
        .trim()
        .to_string()
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line).map(|caps| caps[1].to_string())
}

/// Interpreter lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    AwaitingDiscovery,
    Running,
    Completed,
}

/// How the run ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Tests were discovered and the runner exited cleanly.
    Passed,

    /// Tests were discovered and the runner exited non-zero.
    Failed { exit_code: i32 },

    /// No test ever matched; a failure whatever the runner's exit code.
    DiscoveryFailed { exit_code: i32 },
}

impl RunOutcome {
    /// Exit code the caller should report.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Passed => 0,
            RunOutcome::Failed { exit_code } => *exit_code,
            RunOutcome::DiscoveryFailed { .. } => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Passed)
    }
}

/// Final tally of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,

    /// The child's own exit code; -1 when it was killed by a signal.
    pub child_exit_code: i32,

    pub tests_discovered: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    pub errors: u32,
    pub warnings: u32,
}

/// Streaming accumulator over classified lines.
#[derive(Debug, Clone)]
pub struct LogInterpreter {
    filter: String,
    state: RunState,
    discovered: u32,
    tests_found: bool,
    no_match: bool,
    passed: u32,
    failed: u32,
    errors: u32,
    warnings: u32,
}

impl LogInterpreter {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            state: RunState::AwaitingDiscovery,
            discovered: 0,
            tests_found: false,
            no_match: false,
            passed: 0,
            failed: 0,
            errors: 0,
            warnings: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Whether a "no tests matched" line has been seen.
    pub fn discovery_failed(&self) -> bool {
        self.no_match
    }

    /// Classify `line` and update the run status.
    pub fn observe(&mut self, line: &str) -> RunEvent {
        let event = classify_line(line, &self.filter);
        match &event {
            RunEvent::NoMatch { .. } => self.no_match = true,
            // The marker alone means tests were found, unless it says zero.
            RunEvent::Discovered { count, .. } => {
                self.discovered = self.discovered.saturating_add(count.unwrap_or(0));
                if *count != Some(0) {
                    self.tests_found = true;
                    if self.state == RunState::AwaitingDiscovery {
                        self.state = RunState::Running;
                    }
                }
            }
            RunEvent::TestCompleted { success: true, .. } => self.passed += 1,
            RunEvent::TestCompleted { success: false, .. } => self.failed += 1,
            RunEvent::Diagnostic {
                level: DiagnosticLevel::Error,
                ..
            } => self.errors += 1,
            RunEvent::Diagnostic {
                level: DiagnosticLevel::Warning,
                ..
            } => self.warnings += 1,
            RunEvent::TestStarted { .. } | RunEvent::Unclassified { .. } => {}
        }
        event
    }

    /// Close the run with the child's exit code.
    pub fn finish(&mut self, child_exit_code: i32) -> RunSummary {
        self.state = RunState::Completed;
        let outcome = if self.no_match || !self.tests_found {
            RunOutcome::DiscoveryFailed {
                exit_code: child_exit_code,
            }
        } else if child_exit_code == 0 {
            RunOutcome::Passed
        } else {
            RunOutcome::Failed {
                exit_code: child_exit_code,
            }
        };
        RunSummary {
            outcome,
            child_exit_code,
            tests_discovered: self.discovered,
            tests_passed: self.passed,
            tests_failed: self.failed,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
