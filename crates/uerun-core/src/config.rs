//! Discovery configuration.
//!
//! Launcher roots come from the program-install locations the host exposes
//! through its environment, or from `UERUN_LAUNCHER_ROOTS` when set.

use crate::platform::HostPlatform;
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable overriding the launcher roots (platform path list).
pub const LAUNCHER_ROOTS_ENV: &str = "UERUN_LAUNCHER_ROOTS";

/// Vendor directory created by the launcher under each program-files root.
const LAUNCHER_VENDOR_DIR: &str = "Epic Games";

/// Program-files variables in lookup order, with their fallbacks.
const WINDOWS_PROGRAM_DIRS: [(&str, &str); 3] = [
    ("ProgramW6432", "C:/Program Files"),
    ("ProgramFiles(x86)", "C:/Program Files (x86)"),
    ("ProgramFiles", "C:/Program Files"),
];

/// Inputs shared by all discovery sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Platform whose engine layout is expected.
    pub platform: HostPlatform,

    /// Directories holding `UE_<version>` installations, in discovery order.
    pub launcher_roots: Vec<PathBuf>,
}

impl DiscoveryConfig {
    /// Create a configuration; duplicate roots are dropped, first one wins.
    pub fn new(platform: HostPlatform, launcher_roots: Vec<PathBuf>) -> Self {
        Self {
            platform,
            launcher_roots: dedup_roots(launcher_roots),
        }
    }

    /// Defaults for the running host, ignoring `UERUN_LAUNCHER_ROOTS`.
    pub fn for_host() -> Self {
        let platform = HostPlatform::current();
        let roots = default_launcher_roots(platform, |key| std::env::var_os(key));
        Self::new(platform, roots)
    }

    /// Host defaults, with launcher roots overridden by `UERUN_LAUNCHER_ROOTS`.
    pub fn from_env() -> Self {
        Self::for_host().with_roots_override(|key| std::env::var_os(key))
    }

    /// Replace the launcher roots with the path list `lookup` returns for
    /// `UERUN_LAUNCHER_ROOTS`; unset or empty keeps the current roots.
    pub fn with_roots_override<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        match lookup(LAUNCHER_ROOTS_ENV) {
            Some(value) if !value.is_empty() => {
                self.with_launcher_roots(std::env::split_paths(&value).collect())
            }
            _ => self,
        }
    }

    /// Replace the launcher roots.
    pub fn with_launcher_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.launcher_roots = dedup_roots(roots);
        self
    }
}

/// Launcher roots derived from the host's program-install locations.
///
/// Only Windows has a defined convention; other hosts get no roots.
pub fn default_launcher_roots<F>(platform: HostPlatform, lookup: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    match platform {
        HostPlatform::Windows => WINDOWS_PROGRAM_DIRS
            .iter()
            .map(|(key, fallback)| {
                let base = lookup(key)
                    .filter(|v| !v.is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(fallback));
                base.join(LAUNCHER_VENDOR_DIR)
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn dedup_roots(roots: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut unique: Vec<PathBuf> = Vec::with_capacity(roots.len());
    for root in roots {
        if !unique.contains(&root) {
            unique.push(root);
        }
    }
    unique
}
