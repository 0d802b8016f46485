//! Direct-path probe for engines referenced by filesystem path.

use crate::install::{read_engine_version, InstallKind, InstallationRecord};
use crate::platform::HostPlatform;
use std::path::Path;
use tracing::debug;

/// Version label for path-referenced engines without a readable descriptor.
pub const SOURCE_VERSION_LABEL: &str = "source";

/// Validate `root` as an engine installation.
pub fn probe_engine_path(root: &Path, platform: HostPlatform) -> Option<InstallationRecord> {
    if !root.is_dir() {
        debug!(root = %root.display(), "engine path is not a directory");
        return None;
    }
    let version =
        read_engine_version(root, platform).unwrap_or_else(|| SOURCE_VERSION_LABEL.to_string());
    InstallationRecord::verify(root, InstallKind::Source, version, platform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fake_engine(root: &Path, platform: HostPlatform) {
        let tool = platform.layout().build_tool(root);
        std::fs::create_dir_all(tool.parent().unwrap()).unwrap();
        std::fs::write(tool, "").unwrap();
    }

    #[test]
    fn test_probe_source_build() {
        let engine = tempdir().unwrap();
        fake_engine(engine.path(), HostPlatform::Linux);

        let record = probe_engine_path(engine.path(), HostPlatform::Linux).unwrap();
        assert_eq!(record.kind, InstallKind::Source);
        assert_eq!(record.version, SOURCE_VERSION_LABEL);
        assert!(record.origin_identifier.is_none());
    }

    #[test]
    fn test_probe_uses_platform_layout() {
        let engine = tempdir().unwrap();
        fake_engine(engine.path(), HostPlatform::Windows);

        assert!(probe_engine_path(engine.path(), HostPlatform::Windows).is_some());
        assert!(probe_engine_path(engine.path(), HostPlatform::Linux).is_none());
    }

    #[test]
    fn test_probe_rejects_files_and_missing_paths() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("engine.txt");
        std::fs::write(&file, "").unwrap();

        assert!(probe_engine_path(&file, HostPlatform::Linux).is_none());
        assert!(probe_engine_path(&dir.path().join("missing"), HostPlatform::Linux).is_none());
    }

    #[test]
    fn test_probe_reads_version() {
        let engine = tempdir().unwrap();
        fake_engine(engine.path(), HostPlatform::Linux);
        std::fs::write(
            HostPlatform::Linux.layout().version_descriptor(engine.path()),
            r#"{ "MajorVersion": 5, "MinorVersion": 4 }"#,
        )
        .unwrap();

        let record = probe_engine_path(engine.path(), HostPlatform::Linux).unwrap();
        assert_eq!(record.version, "5.4");
    }
}
