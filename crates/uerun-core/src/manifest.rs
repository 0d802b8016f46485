//! Project manifest (`.uproject`) loading.
//!
//! The manifest is consumed as plain key/value data: only the engine
//! association and the declared module and plugin lists are read, every
//! other key is ignored.

use crate::association::EngineAssociation;
use crate::error::{Result, UeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of project manifests.
pub const MANIFEST_EXTENSION: &str = "uproject";

/// How many parent directories above the start directory are searched.
const MAX_PARENT_SEARCH: usize = 5;

/// The subset of a `.uproject` file uerun reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(rename = "EngineAssociation", default)]
    pub engine_association: String,

    #[serde(rename = "Modules", default)]
    pub modules: Vec<ModuleDescriptor>,

    #[serde(rename = "Plugins", default)]
    pub plugins: Vec<PluginDescriptor>,
}

/// A module declared by the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Type", default = "default_module_type")]
    pub kind: String,

    #[serde(rename = "LoadingPhase", default = "default_loading_phase")]
    pub loading_phase: String,
}

/// A plugin reference declared by the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Plugins without an explicit flag are enabled.
    #[serde(rename = "Enabled", default = "default_enabled")]
    pub enabled: bool,
}

fn default_module_type() -> String {
    "Runtime".to_string()
}

fn default_loading_phase() -> String {
    "Default".to_string()
}

fn default_enabled() -> bool {
    true
}

impl ProjectManifest {
    /// Parse manifest JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// A loaded project: manifest location plus its parsed contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Absolute path of the `.uproject` file.
    pub path: PathBuf,

    /// Parsed manifest.
    pub manifest: ProjectManifest,
}

impl Project {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| UeError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest =
            ProjectManifest::from_json(&text).map_err(|source| UeError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            manifest,
        })
    }

    /// Locate the manifest at or above `start`, then load it.
    pub fn discover(start: &Path) -> Result<Self> {
        let path = find_project_file(start)?;
        Self::load(&path)
    }

    /// Project name: the manifest file stem.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory containing the manifest.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The engine association, classified.
    pub fn association(&self) -> EngineAssociation {
        EngineAssociation::parse(&self.manifest.engine_association)
    }
}

/// Find the project manifest for `start`.
///
/// `start` may name a `.uproject` file directly, or a directory; a
/// directory is searched together with up to five of its parents, and the
/// first manifest found (by file name) wins.
pub fn find_project_file(start: &Path) -> Result<PathBuf> {
    let not_found = || UeError::ManifestNotFound {
        searched: start.to_path_buf(),
    };
    let start = std::fs::canonicalize(start).map_err(|source| UeError::InvalidProjectPath {
        path: start.to_path_buf(),
        source,
    })?;

    if start.is_file() {
        return if has_manifest_extension(&start) {
            Ok(start)
        } else {
            Err(not_found())
        };
    }

    let mut current = Some(start.as_path());
    for _ in 0..=MAX_PARENT_SEARCH {
        let Some(dir) = current else { break };
        if let Some(found) = first_manifest_in(dir) {
            return Ok(found);
        }
        current = dir.parent();
    }

    Err(not_found())
}

fn first_manifest_in(dir: &Path) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "skipping unreadable directory");
            return None;
        }
    };
    let mut manifests: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_manifest_extension(path))
        .collect();
    manifests.sort();
    manifests.into_iter().next()
}

fn has_manifest_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == MANIFEST_EXTENSION)
        .unwrap_or(false)
}
