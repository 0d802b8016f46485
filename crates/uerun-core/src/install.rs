//! Normalized engine installation records.

use crate::platform::HostPlatform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// How an installation was found.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InstallKind {
    /// Installed by the launcher under a program-files root.
    Launcher,
    /// Source build referenced by path.
    Source,
    /// Engine registered in the platform registry.
    Custom,
}

/// One engine installation, whichever source found it.
///
/// Records are only constructed through [`InstallationRecord::verify`], so
/// `build_tool_path` always existed at discovery time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRecord {
    /// Launcher version, `major.minor` from the version descriptor, or a
    /// sentinel label (`custom`, `source`).
    pub version: String,

    /// Engine root directory.
    #[serde(rename = "path")]
    pub root_path: PathBuf,

    #[serde(rename = "type")]
    pub kind: InstallKind,

    /// Build script.
    #[serde(rename = "build_tool")]
    pub build_tool_path: PathBuf,

    /// Headless editor binary; absent when the engine has not built it.
    #[serde(rename = "editor_cmd")]
    pub test_runner_path: Option<PathBuf>,

    /// Registry identifier the record was resolved from.
    #[serde(rename = "guid", skip_serializing_if = "Option::is_none", default)]
    pub origin_identifier: Option<String>,
}

impl InstallationRecord {
    /// Build a record for `root` if its build tool exists.
    pub fn verify(
        root: &Path,
        kind: InstallKind,
        version: String,
        platform: HostPlatform,
    ) -> Option<Self> {
        let layout = platform.layout();
        let build_tool = layout.build_tool(root);
        if !build_tool.is_file() {
            debug!(
                root = %root.display(),
                build_tool = %build_tool.display(),
                "no build tool, not an engine installation"
            );
            return None;
        }

        let test_runner = layout.test_runner(root);
        Some(Self {
            version,
            root_path: root.to_path_buf(),
            kind,
            build_tool_path: build_tool,
            test_runner_path: test_runner.is_file().then_some(test_runner),
            origin_identifier: None,
        })
    }

    /// Attach the identifier this record was registered under.
    pub fn with_origin(mut self, identifier: impl Into<String>) -> Self {
        self.origin_identifier = Some(identifier.into());
        self
    }
}

/// Contents of `Engine/Build/Build.version` that uerun reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
struct BuildVersion {
    #[serde(rename = "MajorVersion", default = "default_major")]
    major: u32,
    #[serde(rename = "MinorVersion", default)]
    minor: u32,
}

fn default_major() -> u32 {
    5
}

/// `major.minor` from the engine's version descriptor.
///
/// `None` when the descriptor is missing, unreadable or malformed.
pub fn read_engine_version(root: &Path, platform: HostPlatform) -> Option<String> {
    let path = platform.layout().version_descriptor(root);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "version descriptor unreadable");
            return None;
        }
    };
    match serde_json::from_str::<BuildVersion>(&text) {
        Ok(v) => Some(format!("{}.{}", v.major, v.minor)),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "version descriptor malformed");
            None
        }
    }
}
