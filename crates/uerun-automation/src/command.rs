//! Test command composition.

use crate::error::{AutomationError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use uerun_core::{DetectionReport, Resolution};

/// Flags that keep the editor unattended, headless and logging to stdout.
/// Every test command carries all of them.
pub const HEADLESS_FLAGS: [&str; 6] = [
    "-stdout",
    "-FullStdOutLogOutput",
    "-unattended",
    "-nullrhi",
    "-nosplash",
    "-nopause",
];

/// A headless automation run of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCommand {
    /// Headless editor binary.
    pub program: PathBuf,

    /// Project manifest passed as the first argument.
    pub project_file: PathBuf,

    /// Automation test filter.
    pub filter: String,
}

impl TestCommand {
    /// Compose a command; without a (non-empty) filter the project's own
    /// name is used.
    pub fn new(program: PathBuf, project_file: PathBuf, filter: Option<&str>) -> Self {
        let filter = match filter.map(str::trim) {
            Some(f) if !f.is_empty() => f.to_string(),
            _ => project_name(&project_file),
        };
        Self {
            program,
            project_file,
            filter,
        }
    }

    /// Compose the command for a detected project.
    pub fn from_report(report: &DetectionReport, filter: Option<&str>) -> Result<Self> {
        let engine = match &report.resolution {
            Resolution::Selected { installation, .. } => installation,
            Resolution::Unresolved { reason } => {
                return Err(AutomationError::Unresolved(reason.clone()))
            }
        };
        let program = engine.test_runner_path.clone().ok_or_else(|| {
            AutomationError::MissingTestRunner {
                version: engine.version.clone(),
                root: engine.root_path.clone(),
            }
        })?;
        Ok(Self::new(program, report.project.path.clone(), filter))
    }

    /// The automation directive run once the editor is up.
    pub fn exec_cmds(&self) -> String {
        format!("-ExecCmds=Automation RunTests {}; Quit", self.filter)
    }

    /// Arguments after the program, in order.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(2 + HEADLESS_FLAGS.len());
        args.push(self.project_file.clone().into_os_string());
        args.push(OsString::from(self.exec_cmds()));
        args.extend(HEADLESS_FLAGS.iter().map(OsString::from));
        args
    }

    /// Full command line for display.
    pub fn display_line(&self) -> String {
        std::iter::once(self.program.as_os_str().to_os_string())
            .chain(self.args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn project_name(project_file: &Path) -> String {
    project_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uerun_core::{
        BuildTargets, InstallKind, InstallationRecord, ProjectIdentity, SelectionReason,
        UnresolvedReason,
    };

    fn report(resolution: Resolution) -> DetectionReport {
        DetectionReport {
            project: ProjectIdentity {
                path: PathBuf::from("/work/Shooter/Shooter.uproject"),
                name: "Shooter".to_string(),
                directory: PathBuf::from("/work/Shooter"),
                engine_association: "5.4".to_string(),
            },
            targets: BuildTargets::default(),
            engine: resolution.installation().cloned(),
            resolution,
            available_installations: Vec::new(),
            last_build_configuration: None,
            platform: "Linux".to_string(),
        }
    }

    fn engine(test_runner: Option<&str>) -> InstallationRecord {
        InstallationRecord {
            version: "5.4".to_string(),
            root_path: PathBuf::from("/opt/UE_5.4"),
            kind: InstallKind::Launcher,
            build_tool_path: PathBuf::from("/opt/UE_5.4/Engine/Build/BatchFiles/Build.sh"),
            test_runner_path: test_runner.map(PathBuf::from),
            origin_identifier: None,
        }
    }

    #[test]
    fn test_default_filter_is_project_name() {
        let cmd = TestCommand::new(
            PathBuf::from("UnrealEditor-Cmd"),
            PathBuf::from("/work/Shooter/Shooter.uproject"),
            None,
        );
        assert_eq!(cmd.filter, "Shooter");
        assert_eq!(cmd.exec_cmds(), "-ExecCmds=Automation RunTests Shooter; Quit");

        let blank = TestCommand::new(
            PathBuf::from("UnrealEditor-Cmd"),
            PathBuf::from("/work/Shooter/Shooter.uproject"),
            Some("  "),
        );
        assert_eq!(blank.filter, "Shooter");
    }

    #[test]
    fn test_args_shape_and_headless_flags() {
        let cmd = TestCommand::new(
            PathBuf::from("UnrealEditor-Cmd"),
            PathBuf::from("/work/Shooter/Shooter.uproject"),
            Some("Shooter.Weapons"),
        );
        let args = cmd.args();

        assert_eq!(args[0], OsString::from("/work/Shooter/Shooter.uproject"));
        assert_eq!(
            args[1],
            OsString::from("-ExecCmds=Automation RunTests Shooter.Weapons; Quit")
        );
        for flag in HEADLESS_FLAGS {
            assert!(args.contains(&OsString::from(flag)), "missing {flag}");
        }
        assert_eq!(args.len(), 2 + HEADLESS_FLAGS.len());
    }

    #[test]
    fn test_from_report_uses_selected_editor() {
        let report = report(Resolution::Selected {
            installation: engine(Some("/opt/UE_5.4/Engine/Binaries/Linux/UnrealEditor-Cmd")),
            reason: SelectionReason::VersionMatch,
        });
        let cmd = TestCommand::from_report(&report, None).unwrap();
        assert_eq!(
            cmd.program,
            PathBuf::from("/opt/UE_5.4/Engine/Binaries/Linux/UnrealEditor-Cmd")
        );
        assert_eq!(cmd.filter, "Shooter");
        assert!(cmd.display_line().ends_with("-nopause"));
    }

    #[test]
    fn test_from_report_without_editor_binary() {
        let report = report(Resolution::Selected {
            installation: engine(None),
            reason: SelectionReason::LauncherFallback,
        });
        let err = TestCommand::from_report(&report, None).unwrap_err();
        assert!(matches!(err, AutomationError::MissingTestRunner { .. }));
    }

    #[test]
    fn test_from_report_unresolved() {
        let report = report(Resolution::Unresolved {
            reason: UnresolvedReason::NoInstallations,
        });
        let err = TestCommand::from_report(&report, Some("X")).unwrap_err();
        assert!(matches!(
            err,
            AutomationError::Unresolved(UnresolvedReason::NoInstallations)
        ));
    }
}
