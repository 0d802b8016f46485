//! Classification of the manifest's `EngineAssociation` field.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the project says about the engine it wants.
///
/// This is the single place the raw string is inspected; everything
/// downstream matches on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EngineAssociation {
    /// Braced identifier of an engine registered on this machine,
    /// e.g. `{1B4B3DB4-4A47-3EA4-F1B4-9BB9D9AA4B63}`.
    Guid(String),

    /// Filesystem path to an engine root.
    Path(String),

    /// Launcher version, e.g. `5.4`.
    VersionTag(String),

    /// No association recorded.
    Empty,
}

impl EngineAssociation {
    /// Classify a raw association value.
    ///
    /// Braced values are identifiers; otherwise a value containing `/` or
    /// `\` is a path; anything else non-empty is a version tag.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            EngineAssociation::Empty
        } else if raw.starts_with('{') && raw.ends_with('}') {
            EngineAssociation::Guid(raw.to_string())
        } else if raw.contains('/') || raw.contains('\\') {
            EngineAssociation::Path(raw.to_string())
        } else {
            EngineAssociation::VersionTag(raw.to_string())
        }
    }

    /// The raw payload, empty for [`EngineAssociation::Empty`].
    pub fn as_str(&self) -> &str {
        match self {
            EngineAssociation::Guid(s)
            | EngineAssociation::Path(s)
            | EngineAssociation::VersionTag(s) => s,
            EngineAssociation::Empty => "",
        }
    }

    /// Payload as a path, for [`EngineAssociation::Path`] only.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            EngineAssociation::Path(s) => Some(Path::new(s)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EngineAssociation::Empty)
    }
}

impl std::fmt::Display for EngineAssociation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineAssociation::Empty => f.write_str("<none>"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guid() {
        let assoc = EngineAssociation::parse("{1B4B3DB4-4A47-3EA4-F1B4-9BB9D9AA4B63}");
        assert!(matches!(assoc, EngineAssociation::Guid(_)));
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(
            EngineAssociation::parse("C:/UnrealEngine"),
            EngineAssociation::Path("C:/UnrealEngine".to_string())
        );
        assert!(matches!(
            EngineAssociation::parse(r"D:\Engines\UE5"),
            EngineAssociation::Path(_)
        ));
        assert!(matches!(
            EngineAssociation::parse("../UnrealEngine"),
            EngineAssociation::Path(_)
        ));
    }

    #[test]
    fn test_braced_value_with_separator_is_still_guid() {
        assert!(matches!(
            EngineAssociation::parse("{a/b}"),
            EngineAssociation::Guid(_)
        ));
    }

    #[test]
    fn test_parse_version_and_empty() {
        assert_eq!(
            EngineAssociation::parse("5.4"),
            EngineAssociation::VersionTag("5.4".to_string())
        );
        assert_eq!(EngineAssociation::parse(""), EngineAssociation::Empty);
        assert_eq!(EngineAssociation::parse("   "), EngineAssociation::Empty);
    }

    #[test]
    fn test_half_braced_value_is_version_tag() {
        assert!(matches!(
            EngineAssociation::parse("{5.4"),
            EngineAssociation::VersionTag(_)
        ));
    }

    #[test]
    fn test_as_path_only_for_paths() {
        assert!(EngineAssociation::parse("/opt/ue").as_path().is_some());
        assert!(EngineAssociation::parse("5.4").as_path().is_none());
    }
}
