//! Discovery sources.
//!
//! Three independent probes, each returning normalized
//! [`InstallationRecord`]s and treating every access failure as "not found":
//!
//! - [`launcher`]: `UE_<version>` directories under launcher roots
//! - [`registry`]: identifiers registered in the platform registry
//! - [`direct`]: an engine root given by path

pub mod direct;
pub mod launcher;
pub mod registry;

use crate::config::DiscoveryConfig;
use crate::install::InstallationRecord;
use registry::EngineRegistry;
use std::path::{Path, PathBuf};

pub use direct::probe_engine_path;
pub use launcher::scan_launcher_installations;
pub use registry::{host_registry, lookup_registered_engine, NoRegistry, StaticRegistry};

/// The discovery sources the resolver consults.
pub trait InstallationSource {
    /// All launcher installations, in discovery order.
    fn launcher_installations(&self) -> Vec<InstallationRecord>;

    /// The installation registered under `identifier`, if any.
    fn registered_installation(&self, identifier: &str) -> Option<InstallationRecord>;

    /// The installation rooted at `path`, if it is one.
    fn path_installation(&self, path: &Path) -> Option<InstallationRecord>;
}

/// Discovery against the real filesystem and registry.
pub struct HostDiscovery {
    config: DiscoveryConfig,
    registry: Box<dyn EngineRegistry>,
    base_dir: Option<PathBuf>,
}

impl HostDiscovery {
    /// Discovery with the host's own registry.
    pub fn new(config: DiscoveryConfig) -> Self {
        Self::with_registry(config, host_registry())
    }

    /// Discovery with an explicit registry backend.
    pub fn with_registry(config: DiscoveryConfig, registry: Box<dyn EngineRegistry>) -> Self {
        Self {
            config,
            registry,
            base_dir: None,
        }
    }

    /// Anchor relative engine paths at `dir` (normally the project directory).
    pub fn relative_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

impl InstallationSource for HostDiscovery {
    fn launcher_installations(&self) -> Vec<InstallationRecord> {
        scan_launcher_installations(&self.config)
    }

    fn registered_installation(&self, identifier: &str) -> Option<InstallationRecord> {
        lookup_registered_engine(self.registry.as_ref(), identifier, self.config.platform)
    }

    fn path_installation(&self, path: &Path) -> Option<InstallationRecord> {
        let root = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };
        probe_engine_path(&root, self.config.platform)
    }
}
