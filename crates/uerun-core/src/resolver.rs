//! Installation resolver.
//!
//! Picks exactly one installation for a project's engine association.
//! Policy, first match wins:
//!
//! 1. `Guid` - the registry lookup's record.
//! 2. `Path` - the direct-path probe's record.
//! 3. `VersionTag` - the first launcher installation with that exact version.
//! 4. Any launcher installation exists - the last one in discovery order.
//!    This is enumeration order, not a version comparison.
//! 5. Otherwise unresolved, with a reason that separates "nothing
//!    installed" from "nothing matched".
//!
//! Each discovery source is queried at most once and nothing is cached
//! between calls.

use crate::association::EngineAssociation;
use crate::discovery::InstallationSource;
use crate::install::InstallationRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which policy branch produced the selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    Registry,
    DirectPath,
    VersionMatch,
    LauncherFallback,
}

/// Why no installation could be selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No association and no launcher installations at all.
    NoInstallations,

    /// The association named an engine no source could find, and there is
    /// no launcher installation to fall back to.
    AssociationUnmatched { association: String },
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::NoInstallations => {
                f.write_str("no engine installations were found on this machine")
            }
            UnresolvedReason::AssociationUnmatched { association } => write!(
                f,
                "no installation matches engine association '{association}'"
            ),
        }
    }
}

/// Outcome of a resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Selected {
        installation: InstallationRecord,
        reason: SelectionReason,
    },
    Unresolved {
        #[serde(flatten)]
        reason: UnresolvedReason,
    },
}

impl Resolution {
    pub fn installation(&self) -> Option<&InstallationRecord> {
        match self {
            Resolution::Selected { installation, .. } => Some(installation),
            Resolution::Unresolved { .. } => None,
        }
    }
}

/// Apply the selection policy.
///
/// `launcher` is the launcher scan result, already enumerated by the
/// caller; `source` is consulted only for the registry or path branch the
/// association calls for.
pub fn resolve(
    association: &EngineAssociation,
    launcher: &[InstallationRecord],
    source: &dyn InstallationSource,
) -> Resolution {
    let direct = match association {
        EngineAssociation::Guid(id) => source
            .registered_installation(id)
            .map(|record| (record, SelectionReason::Registry)),
        EngineAssociation::Path(path) => source
            .path_installation(std::path::Path::new(path))
            .map(|record| (record, SelectionReason::DirectPath)),
        EngineAssociation::VersionTag(version) => launcher
            .iter()
            .find(|record| &record.version == version)
            .cloned()
            .map(|record| (record, SelectionReason::VersionMatch)),
        EngineAssociation::Empty => None,
    };

    if let Some((installation, reason)) = direct {
        info!(
            association = %association,
            version = %installation.version,
            root = %installation.root_path.display(),
            reason = ?reason,
            "selected engine installation"
        );
        return Resolution::Selected {
            installation,
            reason,
        };
    }

    if let Some(last) = launcher.last() {
        if !association.is_empty() {
            debug!(association = %association, "association unmatched, using launcher fallback");
        }
        info!(
            version = %last.version,
            root = %last.root_path.display(),
            "selected most recently enumerated launcher installation"
        );
        return Resolution::Selected {
            installation: last.clone(),
            reason: SelectionReason::LauncherFallback,
        };
    }

    let reason = match association {
        EngineAssociation::Empty => UnresolvedReason::NoInstallations,
        other => UnresolvedReason::AssociationUnmatched {
            association: other.as_str().to_string(),
        },
    };
    info!(%reason, "no engine installation selected");
    Resolution::Unresolved { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::InstallKind;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    fn record(version: &str, kind: InstallKind) -> InstallationRecord {
        let root = PathBuf::from(format!("/engines/{version}"));
        InstallationRecord {
            version: version.to_string(),
            build_tool_path: root.join("Engine/Build/BatchFiles/Build.sh"),
            root_path: root,
            kind,
            test_runner_path: None,
            origin_identifier: None,
        }
    }

    #[derive(Default)]
    struct FakeSource {
        registered: Option<InstallationRecord>,
        at_path: Option<InstallationRecord>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl InstallationSource for FakeSource {
        fn launcher_installations(&self) -> Vec<InstallationRecord> {
            self.calls.borrow_mut().push("launcher");
            Vec::new()
        }

        fn registered_installation(&self, _identifier: &str) -> Option<InstallationRecord> {
            self.calls.borrow_mut().push("registry");
            self.registered.clone()
        }

        fn path_installation(&self, _path: &Path) -> Option<InstallationRecord> {
            self.calls.borrow_mut().push("path");
            self.at_path.clone()
        }
    }

    #[test]
    fn test_guid_uses_registry_only() {
        let source = FakeSource {
            registered: Some(record("custom", InstallKind::Custom)),
            ..Default::default()
        };
        let launcher = vec![record("5.4", InstallKind::Launcher)];

        let resolution = resolve(&EngineAssociation::parse("{ABCD}"), &launcher, &source);

        assert!(matches!(
            resolution,
            Resolution::Selected {
                reason: SelectionReason::Registry,
                ..
            }
        ));
        assert_eq!(*source.calls.borrow(), vec!["registry"]);
    }

    #[test]
    fn test_path_never_matches_launcher_versions() {
        let source = FakeSource::default();
        let launcher = vec![record("/opt/UE", InstallKind::Launcher)];

        let resolution = resolve(&EngineAssociation::parse("/opt/UE"), &launcher, &source);

        assert!(matches!(
            resolution,
            Resolution::Selected {
                reason: SelectionReason::LauncherFallback,
                ..
            }
        ));
        assert_eq!(*source.calls.borrow(), vec!["path"]);
    }

    #[test]
    fn test_version_tag_first_exact_match() {
        let source = FakeSource::default();
        let mut second = record("5.3", InstallKind::Launcher);
        second.root_path = PathBuf::from("/other/UE_5.3");
        let launcher = vec![
            record("5.3", InstallKind::Launcher),
            second,
            record("5.4", InstallKind::Launcher),
        ];

        let resolution = resolve(&EngineAssociation::parse("5.3"), &launcher, &source);

        let installation = resolution.installation().unwrap();
        assert_eq!(installation.root_path, PathBuf::from("/engines/5.3"));
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_version_prefix_is_not_a_match() {
        let source = FakeSource::default();
        let launcher = vec![
            record("5.4", InstallKind::Launcher),
            record("5.1", InstallKind::Launcher),
        ];

        let resolution = resolve(&EngineAssociation::parse("5"), &launcher, &source);

        assert!(matches!(
            resolution,
            Resolution::Selected {
                reason: SelectionReason::LauncherFallback,
                ..
            }
        ));
        assert_eq!(resolution.installation().unwrap().version, "5.1");
    }

    #[test]
    fn test_unresolved_reasons_are_distinct() {
        let source = FakeSource::default();

        let none = resolve(&EngineAssociation::Empty, &[], &source);
        assert_eq!(
            none,
            Resolution::Unresolved {
                reason: UnresolvedReason::NoInstallations
            }
        );

        let unmatched = resolve(&EngineAssociation::parse("5.4"), &[], &source);
        assert_eq!(
            unmatched,
            Resolution::Unresolved {
                reason: UnresolvedReason::AssociationUnmatched {
                    association: "5.4".to_string()
                }
            }
        );
        assert!(unmatched.installation().is_none());
    }

    #[test]
    fn test_resolution_json_shape() {
        let unresolved = Resolution::Unresolved {
            reason: UnresolvedReason::AssociationUnmatched {
                association: "{X}".to_string(),
            },
        };
        let json = serde_json::to_value(&unresolved).unwrap();
        assert_eq!(json["status"], "unresolved");
        assert_eq!(json["reason"], "association_unmatched");
        assert_eq!(json["association"], "{X}");
    }
}
