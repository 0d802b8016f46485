//! uerun - Unreal Engine project detection and headless test runs
//!
//! ## Commands
//!
//! - `detect`: Resolve the engine for a project and print a JSON report
//! - `test`: Run the project's automation tests on the resolved engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

use uerun_automation::{AutomationRunner, RunEvent, RunOutcome, RunSummary, TestCommand};
use uerun_core::{detect, DetectionReport, DiscoveryConfig};

const RULE: &str = "============================================================";

#[derive(Parser)]
#[command(name = "uerun")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find the engine for an Unreal project and run its automation tests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding UE_<version> installs (repeatable; replaces
    /// UERUN_LAUNCHER_ROOTS and the host defaults)
    #[arg(long = "launcher-root", global = true)]
    launcher_roots: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the engine installation and print the detection report as JSON
    Detect {
        /// Project file, or a directory inside the project (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Run automation tests headlessly and report the outcome
    Test {
        /// Project file, or a directory inside the project
        #[arg(default_value = ".")]
        project: PathBuf,

        /// Automation test filter (default: project name)
        filter: Option<String>,

        /// Also echo editor output lines that carry no test information
        #[arg(long)]
        raw: bool,
    },
}

impl Cli {
    fn discovery_config(&self) -> DiscoveryConfig {
        let config = DiscoveryConfig::from_env();
        if self.launcher_roots.is_empty() {
            config
        } else {
            config.with_launcher_roots(self.launcher_roots.clone())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report or the test output
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    uerun_core::init_tracing(cli.json, level);

    let config = cli.discovery_config();
    debug!(roots = ?config.launcher_roots, platform = %config.platform.name(), "discovery config");

    match cli.command {
        Commands::Detect { path } => cmd_detect(&path, config),
        Commands::Test {
            project,
            filter,
            raw,
        } => {
            let code = cmd_test(&project, filter.as_deref(), raw, config).await?;
            std::process::exit(code);
        }
    }
}

fn cmd_detect(path: &Path, config: DiscoveryConfig) -> Result<()> {
    let report = detect(path, config)
        .with_context(|| format!("Failed to inspect project at {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn cmd_test(
    project: &Path,
    filter: Option<&str>,
    raw: bool,
    config: DiscoveryConfig,
) -> Result<i32> {
    let report = detect(project, config)
        .with_context(|| format!("Failed to inspect project at {}", project.display()))?;
    let command =
        TestCommand::from_report(&report, filter).context("Cannot start automation tests")?;

    print_banner(&report, &command);

    let summary = AutomationRunner::run(&command, |event, line| {
        if let Some(text) = forwarded_line(event, line, raw) {
            println!("{text}");
        }
    })
    .await?;

    println!();
    println!("{RULE}");
    println!("{}", status_line(&summary));
    println!(
        "Tests: {} discovered, {} passed, {} failed",
        summary.tests_discovered, summary.tests_passed, summary.tests_failed
    );
    println!("{RULE}");

    Ok(summary.outcome.exit_code())
}

fn print_banner(report: &DetectionReport, command: &TestCommand) {
    println!("{RULE}");
    println!("Project: {}", report.project.path.display());
    println!("Filter:  {}", command.filter);
    if let Some(engine) = &report.engine {
        println!("Engine:  {} ({})", engine.version, engine.root_path.display());
    }
    println!("Command: {}", command.display_line());
    println!("{RULE}");
}

/// What to print for one line of editor output.
fn forwarded_line(event: &RunEvent, line: &str, raw: bool) -> Option<String> {
    match event {
        RunEvent::Unclassified { .. } if raw => Some(line.to_string()),
        _ => event.readable(),
    }
}

fn status_line(summary: &RunSummary) -> String {
    match summary.outcome {
        RunOutcome::Passed => "OVERALL STATUS: SUCCESS".to_string(),
        outcome => format!("OVERALL STATUS: FAILED (Exit Code: {})", outcome.exit_code()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(outcome: RunOutcome) -> RunSummary {
        RunSummary {
            outcome,
            child_exit_code: 0,
            tests_discovered: 1,
            tests_passed: 1,
            tests_failed: 0,
            errors: 0,
            warnings: 0,
        }
    }

    #[test]
    fn test_parse_test_command() {
        let cli = Cli::try_parse_from([
            "uerun",
            "test",
            "Shooter.uproject",
            "Shooter.Weapons",
            "--raw",
        ])
        .unwrap();
        match cli.command {
            Commands::Test {
                project,
                filter,
                raw,
            } => {
                assert_eq!(project, PathBuf::from("Shooter.uproject"));
                assert_eq!(filter.as_deref(), Some("Shooter.Weapons"));
                assert!(raw);
            }
            _ => panic!("expected test command"),
        }
    }

    #[test]
    fn test_parse_detect_defaults_to_cwd() {
        let cli = Cli::try_parse_from(["uerun", "--verbose", "detect"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Detect { ref path } if path == Path::new(".")));
    }

    #[test]
    fn test_launcher_roots_override_defaults() {
        let cli = Cli::try_parse_from([
            "uerun",
            "detect",
            "--launcher-root",
            "/opt/epic",
            "--launcher-root",
            "/srv/engines",
        ])
        .unwrap();
        let config = cli.discovery_config();
        assert_eq!(
            config.launcher_roots,
            vec![PathBuf::from("/opt/epic"), PathBuf::from("/srv/engines")]
        );
    }

    #[test]
    fn test_raw_mode_adds_unclassified_lines_only() {
        let no_match = RunEvent::NoMatch {
            filter: "Missing".to_string(),
        };
        let raw_no_match = "LogAutomationCommandLine: Error: No automation tests matched 'Missing'";
        for raw in [false, true] {
            assert_eq!(
                forwarded_line(&no_match, raw_no_match, raw).as_deref(),
                Some("ERROR: No tests matched filter 'Missing'")
            );
        }

        let completed = RunEvent::TestCompleted {
            name: "A".to_string(),
            success: true,
            fragment: "Test Completed. Result={Success} Name={A}".to_string(),
        };
        let raw_completed =
            "LogAutomationController: Display: Test Completed. Result={Success} Name={A}";
        assert_eq!(
            forwarded_line(&completed, raw_completed, true).as_deref(),
            Some("Test Completed. Result={Success} Name={A}")
        );

        let other = RunEvent::Unclassified {
            line: "LogInit: Display: Engine is initialized.".to_string(),
        };
        let raw_other = "LogInit: Display: Engine is initialized.";
        assert_eq!(forwarded_line(&other, raw_other, false), None);
        assert_eq!(
            forwarded_line(&other, raw_other, true).as_deref(),
            Some(raw_other)
        );
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(
            status_line(&summary(RunOutcome::Passed)),
            "OVERALL STATUS: SUCCESS"
        );
        assert_eq!(
            status_line(&summary(RunOutcome::Failed { exit_code: 3 })),
            "OVERALL STATUS: FAILED (Exit Code: 3)"
        );
        assert_eq!(
            status_line(&summary(RunOutcome::DiscoveryFailed { exit_code: 0 })),
            "OVERALL STATUS: FAILED (Exit Code: 1)"
        );
    }

    #[test]
    fn test_detect_command_on_missing_project_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = DiscoveryConfig::new(uerun_core::HostPlatform::Linux, Vec::new());
        let err = cmd_detect(dir.path(), config).unwrap_err();
        assert!(err.to_string().contains("Failed to inspect project"));
    }
}
