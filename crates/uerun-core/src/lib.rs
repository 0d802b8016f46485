//! uerun-core: engine installation discovery and project inspection.
//!
//! Given a project manifest, finds the engine installation its
//! `EngineAssociation` asks for. Three discovery sources (launcher tree,
//! platform registry, direct path) feed a fixed-priority resolver; the
//! project's build targets and last built configuration are inspected
//! alongside.
//!
//! Discovery never fails: absent launchers, registry keys or engine
//! directories are empty results. Only manifest problems are errors.

pub mod association;
pub mod build_state;
pub mod config;
pub mod discovery;
pub mod error;
pub mod install;
pub mod manifest;
pub mod platform;
pub mod report;
pub mod resolver;
pub mod targets;
pub mod telemetry;

pub use association::EngineAssociation;
pub use build_state::{inspect_last_build, inspect_output_dir, BuildConfigurationSnapshot};
pub use config::DiscoveryConfig;
pub use discovery::{HostDiscovery, InstallationSource};
pub use error::{Result, UeError};
pub use install::{InstallKind, InstallationRecord};
pub use manifest::{find_project_file, Project, ProjectManifest};
pub use platform::{EngineLayout, HostPlatform};
pub use report::{detect, detect_with, DetectionReport, ProjectIdentity};
pub use resolver::{resolve, Resolution, SelectionReason, UnresolvedReason};
pub use targets::{scan_build_targets, BuildTarget, BuildTargets};
pub use telemetry::init_tracing;

/// uerun version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
