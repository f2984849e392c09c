//! Binding host interpreters as packages.
//!
//! A bind wraps an interpreter that is already installed on the host as a
//! versioned, relocatable package. The flow is linear and synchronous:
//!
//! 1. locate the executable ([`crate::locate`])
//! 2. extract its version ([`crate::version::extract_version`])
//! 3. gate the version against the accepted range
//! 4. discover builtin module directories ([`crate::introspect`])
//! 5. materialize the package inside a [`PackageMaker`] transaction
//!
//! Any failure before step 5 finishes leaves no package behind.
//!
//! # Submodules
//!
//! - [`python`] - Python binding

pub mod python;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::locate::LocateError;
use crate::package::{PackageError, PackageMaker};
use crate::platform::Platform;
use crate::process::ProcessError;
use crate::version::VersionError;

/// Input to a bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
  /// Directory packages are installed under.
  pub install_path: PathBuf,
  /// Accepted version range, in semver requirement syntax.
  pub range: Option<String>,
  /// Use this executable instead of searching for one.
  pub exe: Option<PathBuf>,
  /// Replace an already installed package of the same version.
  pub force: bool,
}

impl BindRequest {
  pub fn new(install_path: impl Into<PathBuf>) -> Self {
    Self {
      install_path: install_path.into(),
      range: None,
      exe: None,
      force: false,
    }
  }

  pub fn with_range(mut self, range: impl Into<String>) -> Self {
    self.range = Some(range.into());
    self
  }

  pub fn with_exe(mut self, exe: impl Into<PathBuf>) -> Self {
    self.exe = Some(exe.into());
    self
  }

  pub fn with_force(mut self, force: bool) -> Self {
    self.force = force;
    self
  }

  pub(crate) fn maker(&self) -> PackageMaker {
    PackageMaker::new(&self.install_path).force(self.force)
  }
}

/// Result of a successful bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledVariant {
  pub name: String,
  pub version: String,
  pub variant: Platform,
  /// `<install_path>/<name>/<version>`
  pub version_dir: PathBuf,
  /// The variant's payload directory.
  pub root: PathBuf,
}

/// Errors that abort a bind.
#[derive(Debug, Error)]
pub enum BindError {
  #[error(transparent)]
  NotFound(#[from] LocateError),

  #[error("failed to launch interpreter: {0}")]
  Process(#[source] ProcessError),

  #[error("failed to extract version: {0}")]
  Extraction(#[source] VersionError),

  #[error("{0}")]
  InvalidRange(#[source] VersionError),

  #[error("version {version} does not satisfy '{range}'")]
  VersionMismatch { version: String, range: String },

  #[error("package already installed at {0} (use --force to replace it)")]
  PackageExists(PathBuf),

  #[error("failed to materialize package: {0}")]
  Materialization(#[source] PackageError),

  #[error("unsupported host platform {os}-{arch}")]
  UnsupportedPlatform { os: String, arch: String },
}

impl From<VersionError> for BindError {
  fn from(err: VersionError) -> Self {
    match err {
      VersionError::Process(e) => BindError::Process(e),
      VersionError::Mismatch { version, range } => BindError::VersionMismatch { version, range },
      e @ VersionError::InvalidRange { .. } => BindError::InvalidRange(e),
      e @ (VersionError::ProbeFailed { .. } | VersionError::Unparsable { .. }) => BindError::Extraction(e),
    }
  }
}

impl From<PackageError> for BindError {
  fn from(err: PackageError) -> Self {
    match err {
      PackageError::Exists(path) => BindError::PackageExists(path),
      e => BindError::Materialization(e),
    }
  }
}

/// The host platform, or `UnsupportedPlatform`.
pub fn host_platform() -> Result<Platform, BindError> {
  Platform::current().ok_or_else(|| BindError::UnsupportedPlatform {
    os: std::env::consts::OS.to_string(),
    arch: std::env::consts::ARCH.to_string(),
  })
}
