//! Host platform and the engine's on-disk layout for it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Host operating system, as far as engine layout is concerned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HostPlatform {
    Windows,
    Mac,
    Linux,
    Other,
}

impl HostPlatform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_os = "macos") {
            HostPlatform::Mac
        } else if cfg!(target_os = "linux") {
            HostPlatform::Linux
        } else {
            HostPlatform::Other
        }
    }

    /// Operating system name as reported in the detection report.
    pub fn name(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "Windows",
            HostPlatform::Mac => "Darwin",
            HostPlatform::Linux => "Linux",
            HostPlatform::Other => "Unknown",
        }
    }

    /// Directory name the engine uses under `Binaries/` for this platform.
    pub fn binaries_dir(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "Win64",
            HostPlatform::Mac => "Mac",
            HostPlatform::Linux | HostPlatform::Other => "Linux",
        }
    }

    /// Extension of loadable module binaries, without the dot.
    pub fn module_extension(&self) -> &'static str {
        match self {
            HostPlatform::Windows => "dll",
            HostPlatform::Mac => "dylib",
            HostPlatform::Linux | HostPlatform::Other => "so",
        }
    }

    /// Relative locations of engine tools for this platform.
    pub fn layout(&self) -> EngineLayout {
        EngineLayout { platform: *self }
    }
}

impl std::fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Paths of the engine files uerun cares about, relative to an engine root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLayout {
    platform: HostPlatform,
}

impl EngineLayout {
    /// Build script whose presence marks a usable installation.
    pub fn build_tool(&self, root: &Path) -> PathBuf {
        let script = match self.platform {
            HostPlatform::Windows => "Build.bat",
            _ => "Build.sh",
        };
        root.join("Engine")
            .join("Build")
            .join("BatchFiles")
            .join(script)
    }

    /// Command-line editor binary that runs automation tests headless.
    pub fn test_runner(&self, root: &Path) -> PathBuf {
        let binary = match self.platform {
            HostPlatform::Windows => "UnrealEditor-Cmd.exe",
            _ => "UnrealEditor-Cmd",
        };
        root.join("Engine")
            .join("Binaries")
            .join(self.platform.binaries_dir())
            .join(binary)
    }

    /// JSON descriptor carrying `MajorVersion` / `MinorVersion`.
    pub fn version_descriptor(&self, root: &Path) -> PathBuf {
        root.join("Engine").join("Build").join("Build.version")
    }
}
