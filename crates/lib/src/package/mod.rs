//! Package definitions and creation.

mod definition;
mod maker;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::fs::CopyError;

pub use definition::{
  EnvCommand, NoopToggle, PACKAGE_FORMAT_VERSION, PackageDefinition, ROOT_PLACEHOLDER, expand_root,
};
pub use maker::{InstalledPackage, PackageMaker, PackageRecord};

/// Errors that can occur while creating or reading a package.
#[derive(Debug, Error)]
pub enum PackageError {
  /// A package with this name and version is already installed.
  #[error("package already exists at {0} (use force to replace it)")]
  Exists(PathBuf),

  #[error("invalid package {kind} '{value}'")]
  InvalidComponent { kind: &'static str, value: String },

  /// Copying payload files failed.
  #[error(transparent)]
  Copy(#[from] CopyError),

  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to move {from} to {to}: {source}")]
  Rename {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  /// No `package.json` in the given directory.
  #[error("{0} is not a package version directory")]
  NotAPackage(PathBuf),

  #[error("failed to parse package definition: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize package definition: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("unsupported package format version {0}")]
  UnsupportedVersion(u32),
}
