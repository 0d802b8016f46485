//! Detection report: everything uerun learns about a project and the
//! engine it should run with.

use crate::build_state::{inspect_last_build, BuildConfigurationSnapshot};
use crate::config::DiscoveryConfig;
use crate::discovery::{HostDiscovery, InstallationSource};
use crate::error::Result;
use crate::install::InstallationRecord;
use crate::manifest::Project;
use crate::platform::HostPlatform;
use crate::resolver::{resolve, Resolution};
use crate::targets::{scan_build_targets, BuildTargets};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Identity of the inspected project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdentity {
    /// Manifest path.
    pub path: PathBuf,
    pub name: String,
    pub directory: PathBuf,
    /// Association exactly as written in the manifest.
    pub engine_association: String,
}

/// Result of inspecting a project.
///
/// `engine` being `None` and `available_installations` being empty are
/// separate conditions; `resolution` says which one applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    #[serde(rename = "uproject")]
    pub project: ProjectIdentity,
    pub targets: BuildTargets,
    pub engine: Option<InstallationRecord>,
    pub resolution: Resolution,
    pub available_installations: Vec<InstallationRecord>,
    pub last_build_configuration: Option<BuildConfigurationSnapshot>,
    pub platform: String,
}

impl DetectionReport {
    /// Headless editor binary of the selected installation.
    pub fn test_runner(&self) -> Option<&Path> {
        self.engine.as_ref()?.test_runner_path.as_deref()
    }
}

/// Find the project at or above `start` and inspect it on this host.
pub fn detect(start: &Path, config: DiscoveryConfig) -> Result<DetectionReport> {
    let project = Project::discover(start)?;
    let platform = config.platform;
    let discovery = HostDiscovery::new(config).relative_to(project.directory());
    Ok(detect_with(&project, &discovery, platform))
}

/// Inspect an already loaded project against explicit discovery sources.
pub fn detect_with(
    project: &Project,
    source: &dyn InstallationSource,
    platform: HostPlatform,
) -> DetectionReport {
    let association = project.association();
    info!(
        project = %project.path.display(),
        association = %association,
        "inspecting project"
    );

    let launcher = source.launcher_installations();
    let resolution = resolve(&association, &launcher, source);

    DetectionReport {
        project: ProjectIdentity {
            path: project.path.clone(),
            name: project.name(),
            directory: project.directory().to_path_buf(),
            engine_association: project.manifest.engine_association.clone(),
        },
        targets: scan_build_targets(project),
        engine: resolution.installation().cloned(),
        resolution,
        available_installations: launcher,
        last_build_configuration: inspect_last_build(project, platform),
        platform: platform.name().to_string(),
    }
}
