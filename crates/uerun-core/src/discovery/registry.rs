//! Registry lookup of engines registered under an identifier.
//!
//! Source builds register themselves as a value named after a braced
//! identifier whose data is the engine root. Registry access is a
//! capability: hosts without a registry use [`NoRegistry`], which never
//! resolves anything.

use crate::install::{read_engine_version, InstallKind, InstallationRecord};
use crate::platform::HostPlatform;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Version label for registered engines without a readable descriptor.
pub const CUSTOM_VERSION_LABEL: &str = "custom";

const BUILDS_KEY: &str = r"Software\Epic Games\Unreal Engine\Builds";
const BUILDS_KEY_WOW64: &str = r"Software\Wow6432Node\Epic Games\Unreal Engine\Builds";

/// Top-level registry hive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryHive {
    CurrentUser,
    LocalMachine,
}

/// One key that may hold engine registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryLocation {
    pub hive: RegistryHive,
    pub subkey: &'static str,
}

/// Locations queried, in priority order: per-user before machine-wide,
/// native view before the 32-bit compatibility view.
pub const ENGINE_BUILDS_LOCATIONS: [RegistryLocation; 3] = [
    RegistryLocation {
        hive: RegistryHive::CurrentUser,
        subkey: BUILDS_KEY,
    },
    RegistryLocation {
        hive: RegistryHive::LocalMachine,
        subkey: BUILDS_KEY,
    },
    RegistryLocation {
        hive: RegistryHive::LocalMachine,
        subkey: BUILDS_KEY_WOW64,
    },
];

/// Failure reading a single registry value.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Key or value does not exist
    #[error("registry entry not found")]
    NotFound,

    /// The process may not read this key
    #[error("registry access denied")]
    AccessDenied,

    /// No registry on this host
    #[error("registry not available on this platform")]
    Unsupported,

    /// Any other failure
    #[error("registry error: {0}")]
    Other(String),
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => RegistryError::NotFound,
            std::io::ErrorKind::PermissionDenied => RegistryError::AccessDenied,
            _ => RegistryError::Other(err.to_string()),
        }
    }
}

/// Read access to string values in a platform registry.
pub trait EngineRegistry {
    /// Read the string value `name` under `location`.
    fn read_value(
        &self,
        location: &RegistryLocation,
        name: &str,
    ) -> std::result::Result<String, RegistryError>;
}

/// Registry for hosts that have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegistry;

impl EngineRegistry for NoRegistry {
    fn read_value(
        &self,
        _location: &RegistryLocation,
        _name: &str,
    ) -> std::result::Result<String, RegistryError> {
        Err(RegistryError::Unsupported)
    }
}

/// The Windows registry.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsRegistry;

#[cfg(windows)]
impl EngineRegistry for WindowsRegistry {
    fn read_value(
        &self,
        location: &RegistryLocation,
        name: &str,
    ) -> std::result::Result<String, RegistryError> {
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ};
        use winreg::RegKey;

        let hive = match location.hive {
            RegistryHive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
            RegistryHive::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
        };
        let key = hive.open_subkey_with_flags(location.subkey, KEY_READ)?;
        let value: String = key.get_value(name)?;
        Ok(value)
    }
}

/// The registry of the running host.
pub fn host_registry() -> Box<dyn EngineRegistry> {
    #[cfg(windows)]
    {
        Box::new(WindowsRegistry)
    }
    #[cfg(not(windows))]
    {
        Box::new(NoRegistry)
    }
}

/// In-memory registry, for tests and for callers that already hold the
/// registrations.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    values: HashMap<(RegistryHive, &'static str, String), String>,
    denied: Vec<RegistryLocation>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` = `data` under `location`.
    pub fn with_value(
        mut self,
        location: RegistryLocation,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        self.values
            .insert((location.hive, location.subkey, name.into()), data.into());
        self
    }

    /// Make every read under `location` fail with access denied.
    pub fn with_denied(mut self, location: RegistryLocation) -> Self {
        self.denied.push(location);
        self
    }
}

impl EngineRegistry for StaticRegistry {
    fn read_value(
        &self,
        location: &RegistryLocation,
        name: &str,
    ) -> std::result::Result<String, RegistryError> {
        if self.denied.contains(location) {
            return Err(RegistryError::AccessDenied);
        }
        self.values
            .get(&(location.hive, location.subkey, name.to_string()))
            .cloned()
            .ok_or(RegistryError::NotFound)
    }
}

/// Resolve a registered engine identifier to an installation.
///
/// Locations are tried in [`ENGINE_BUILDS_LOCATIONS`] order and the first
/// one naming a verified engine root wins. Unreadable locations, and
/// values pointing at a missing directory or one without a build tool, are
/// skipped.
pub fn lookup_registered_engine(
    registry: &dyn EngineRegistry,
    identifier: &str,
    platform: HostPlatform,
) -> Option<InstallationRecord> {
    for location in &ENGINE_BUILDS_LOCATIONS {
        let data = match registry.read_value(location, identifier) {
            Ok(data) => data,
            Err(err) => {
                debug!(
                    hive = ?location.hive,
                    subkey = location.subkey,
                    identifier,
                    error = %err,
                    "registry location skipped"
                );
                continue;
            }
        };

        let root = Path::new(data.trim());
        if !root.is_dir() {
            debug!(identifier, root = %root.display(), "registered engine root missing");
            continue;
        }
        let version = read_engine_version(root, platform)
            .unwrap_or_else(|| CUSTOM_VERSION_LABEL.to_string());
        if let Some(record) = InstallationRecord::verify(root, InstallKind::Custom, version, platform)
        {
            return Some(record.with_origin(identifier));
        }
    }
    None
}
