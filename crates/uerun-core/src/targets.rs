//! Build target scanner.
//!
//! Declared modules come from the manifest and are always included.
//! `Source/*.Target.cs` files add the targets the manifest does not name.

use crate::manifest::Project;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Suffix of target definition files.
pub const TARGET_FILE_SUFFIX: &str = ".Target.cs";

/// A module declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub loading_phase: String,
}

/// Everything buildable the project exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTargets {
    /// Declared modules, in manifest order.
    pub modules: Vec<BuildTarget>,

    /// Names of enabled plugins, in manifest order.
    pub plugins: Vec<String>,

    /// Scanned target names not already declared as modules. Order follows
    /// directory enumeration and must not be relied on.
    pub available_targets: Vec<String>,
}

impl BuildTargets {
    /// Declared module names followed by scanned-only targets.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.modules
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.available_targets.iter().map(String::as_str))
    }
}

/// Collect the project's build targets.
///
/// Names are unique across `modules` and `available_targets`.
pub fn scan_build_targets(project: &Project) -> BuildTargets {
    let mut seen: HashSet<String> = HashSet::new();
    let modules: Vec<BuildTarget> = project
        .manifest
        .modules
        .iter()
        .filter(|m| !m.name.is_empty() && seen.insert(m.name.clone()))
        .map(|m| BuildTarget {
            name: m.name.clone(),
            kind: m.kind.clone(),
            loading_phase: m.loading_phase.clone(),
        })
        .collect();

    let plugins = project
        .manifest
        .plugins
        .iter()
        .filter(|p| p.enabled && !p.name.is_empty())
        .map(|p| p.name.clone())
        .collect();

    let available_targets = scan_target_files(&project.directory().join("Source"))
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect();

    BuildTargets {
        modules,
        plugins,
        available_targets,
    }
}

/// Base names of `*.Target.cs` files directly inside `source_dir`.
fn scan_target_files(source_dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(source_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %source_dir.display(), error = %err, "no source directory to scan");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name();
            let base = file_name.to_str()?.strip_suffix(TARGET_FILE_SUFFIX)?;
            (!base.is_empty()).then(|| base.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ProjectManifest;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn project_in(dir: &Path, manifest_json: &str) -> Project {
        Project {
            path: dir.join("Shooter.uproject"),
            manifest: ProjectManifest::from_json(manifest_json).unwrap(),
        }
    }

    #[test]
    fn test_declared_modules_first_then_scanned() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("Source");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("Shooter.Target.cs"), "").unwrap();
        std::fs::write(source.join("ShooterEditor.Target.cs"), "").unwrap();
        std::fs::write(source.join("Shooter.Build.cs"), "").unwrap();

        let project = project_in(
            dir.path(),
            r#"{ "Modules": [{ "Name": "Shooter", "Type": "Runtime", "LoadingPhase": "Default" }] }"#,
        );
        let targets = scan_build_targets(&project);

        assert_eq!(targets.modules.len(), 1);
        assert_eq!(targets.modules[0].name, "Shooter");
        assert_eq!(targets.available_targets, vec!["ShooterEditor".to_string()]);
    }

    #[test]
    fn test_disabled_plugins_are_dropped() {
        let dir = tempdir().unwrap();
        let project = project_in(
            dir.path(),
            r#"{ "Plugins": [
                { "Name": "Niagara" },
                { "Name": "Paper2D", "Enabled": false },
                { "Name": "OnlineSubsystem", "Enabled": true }
            ] }"#,
        );
        let targets = scan_build_targets(&project);
        assert_eq!(targets.plugins, vec!["Niagara", "OnlineSubsystem"]);
    }

    #[test]
    fn test_missing_source_dir() {
        let project = Project {
            path: PathBuf::from("/nowhere/Game.uproject"),
            manifest: ProjectManifest::default(),
        };
        let targets = scan_build_targets(&project);
        assert_eq!(targets, BuildTargets::default());
    }

    #[test]
    fn test_names_are_unique() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("Source");
        std::fs::create_dir_all(&source).unwrap();
        for name in ["Shooter", "ShooterEditor", "ShooterServer", "ShooterClient"] {
            std::fs::write(source.join(format!("{name}{TARGET_FILE_SUFFIX}")), "").unwrap();
        }
        let project = project_in(
            dir.path(),
            r#"{ "Modules": [{ "Name": "ShooterServer" }, { "Name": "Shooter" }, { "Name": "Shooter" }] }"#,
        );

        let targets = scan_build_targets(&project);
        let mut names: Vec<&str> = targets.all_names().collect();
        assert_eq!(&names[..2], &["ShooterServer", "Shooter"]);
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 4);
    }

    #[test]
    fn test_nameless_modules_are_skipped() {
        let dir = tempdir().unwrap();
        let project = project_in(dir.path(), r#"{ "Modules": [{ "Type": "Editor" }] }"#);
        assert!(scan_build_targets(&project).modules.is_empty());
    }
}
