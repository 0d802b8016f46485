//! Launcher tree scanner.
//!
//! The launcher installs each engine version as `<root>/UE_<version>/`.

use crate::config::DiscoveryConfig;
use crate::install::{InstallKind, InstallationRecord};
use crate::platform::HostPlatform;
use std::path::Path;
use tracing::debug;

/// Directory-name prefix of launcher installations.
pub const LAUNCHER_DIR_PREFIX: &str = "UE_";

/// Enumerate launcher installations under every configured root.
///
/// Roots are visited in configured order and subdirectories by name, so
/// the result is stable for an unchanged filesystem. Missing roots are
/// skipped.
pub fn scan_launcher_installations(config: &DiscoveryConfig) -> Vec<InstallationRecord> {
    config
        .launcher_roots
        .iter()
        .flat_map(|root| scan_root(root, config.platform))
        .collect()
}

fn scan_root(root: &Path, platform: HostPlatform) -> Vec<InstallationRecord> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(root = %root.display(), error = %err, "launcher root not readable");
            return Vec::new();
        }
    };

    let mut dirs: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    dirs.iter()
        .filter_map(|dir| {
            let name = dir.file_name()?.to_str()?;
            let version = name.strip_prefix(LAUNCHER_DIR_PREFIX)?;
            if version.is_empty() {
                return None;
            }
            let record = InstallationRecord::verify(
                dir,
                InstallKind::Launcher,
                version.to_string(),
                platform,
            )?;
            debug!(version = %record.version, root = %dir.display(), "found launcher installation");
            Some(record)
        })
        .collect()
}
