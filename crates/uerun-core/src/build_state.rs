//! Build-state inspector.
//!
//! Infers the most recently built configuration from modification times in
//! the project's `Binaries/<Platform>` directory. This is best-effort: the
//! engine keeps no build record, and equal timestamps resolve in
//! enumeration order.

use crate::manifest::Project;
use crate::platform::HostPlatform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Configurations recognized by their artifact suffix.
pub const BUILD_CONFIGURATIONS: [&str; 4] = ["DebugGame", "Shipping", "Debug", "Development"];

/// Configuration credited with artifacts that carry no suffix.
pub const DEFAULT_CONFIGURATION: &str = "Development";

/// Extension of target receipt files written next to binaries.
pub const TARGET_RECEIPT_EXTENSION: &str = "target";

/// The configuration whose artifacts are newest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfigurationSnapshot {
    #[serde(rename = "configuration")]
    pub configuration_name: String,
    pub last_modified: DateTime<Utc>,
    #[serde(rename = "file")]
    pub evidence_file: String,
}

/// Inspect the project's output directory for the host platform layout.
pub fn inspect_last_build(
    project: &Project,
    platform: HostPlatform,
) -> Option<BuildConfigurationSnapshot> {
    let binaries = project
        .directory()
        .join("Binaries")
        .join(platform.binaries_dir());
    inspect_output_dir(&binaries, &project.name(), platform)
}

/// Inspect `binaries_dir` for artifacts of `project_name`.
pub fn inspect_output_dir(
    binaries_dir: &Path,
    project_name: &str,
    platform: HostPlatform,
) -> Option<BuildConfigurationSnapshot> {
    let entries = match std::fs::read_dir(binaries_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %binaries_dir.display(), error = %err, "no build output to inspect");
            return None;
        }
    };

    let artifacts: Vec<(String, SystemTime)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let meta = entry.metadata().ok()?;
            if !meta.is_file() {
                return None;
            }
            let name = entry.file_name().into_string().ok()?;
            Some((name, meta.modified().ok()?))
        })
        .collect();

    let module_ext = format!(".{}", platform.module_extension());
    let receipt_ext = format!(".{TARGET_RECEIPT_EXTENSION}");

    // Newest artifact per configuration, in BUILD_CONFIGURATIONS order.
    let mut newest: Vec<(&str, &str, SystemTime)> = Vec::new();
    for config in BUILD_CONFIGURATIONS {
        let suffix = format!("-{}-{}", platform.binaries_dir(), config);
        let binary = format!("{suffix}{module_ext}");
        let receipt = format!("{suffix}{receipt_ext}");
        let best = newest_matching(&artifacts, |name| {
            name.ends_with(&binary) || name.ends_with(&receipt)
        });
        if let Some((name, modified)) = best {
            newest.push((config, name, modified));
        }
    }

    let unsuffixed = newest_matching(&artifacts, |name| {
        name.ends_with(&module_ext)
            && name.contains(project_name)
            && !BUILD_CONFIGURATIONS
                .iter()
                .any(|config| name.contains(&format!("-{config}")))
    });
    if let Some((name, modified)) = unsuffixed {
        match newest.iter_mut().find(|(c, _, _)| *c == DEFAULT_CONFIGURATION) {
            Some(entry) if modified > entry.2 => *entry = (DEFAULT_CONFIGURATION, name, modified),
            Some(_) => {}
            None => newest.push((DEFAULT_CONFIGURATION, name, modified)),
        }
    }

    let mut latest: Option<(&str, &str, SystemTime)> = None;
    for candidate in newest {
        if latest.map_or(true, |(_, _, t)| candidate.2 > t) {
            latest = Some(candidate);
        }
    }

    latest.map(|(config, file, modified)| BuildConfigurationSnapshot {
        configuration_name: config.to_string(),
        last_modified: DateTime::<Utc>::from(modified),
        evidence_file: file.to_string(),
    })
}

fn newest_matching<'a, F>(
    artifacts: &'a [(String, SystemTime)],
    matches: F,
) -> Option<(&'a str, SystemTime)>
where
    F: Fn(&str) -> bool,
{
    let mut best: Option<(&'a str, SystemTime)> = None;
    for (name, modified) in artifacts {
        if !matches(name) {
            continue;
        }
        if best.map_or(true, |(_, t)| *modified > t) {
            best = Some((name.as_str(), *modified));
        }
    }
    best
}
