//! On-disk package definition (`package.json`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::PackageError;
use crate::consts::PACKAGE_DEFINITION;

/// Current `package.json` format version.
pub const PACKAGE_FORMAT_VERSION: u32 = 1;

/// Placeholder for the variant root in command paths.
pub const ROOT_PLACEHOLDER: &str = "{root}";

/// A capability toggle that turns an environment command into a no-op.
///
/// The command is skipped when the caller's range for `name` (or `default`
/// when the caller gives none) contains `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoopToggle {
  pub name: String,
  pub default: String,
  pub value: String,
}

/// One environment mutation recorded in a package definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EnvCommand {
  /// Put `path` in front of `var`.
  PrependPath {
    var: String,
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unless: Option<NoopToggle>,
  },
  /// Append every immediate subdirectory of `dir` to `var`, in name order.
  AppendSubdirs {
    var: String,
    dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unless: Option<NoopToggle>,
  },
}

impl EnvCommand {
  pub fn toggle(&self) -> Option<&NoopToggle> {
    match self {
      EnvCommand::PrependPath { unless, .. }
      | EnvCommand::AppendSubdirs { unless, .. } => unless.as_ref(),
    }
  }
}

/// Expand `{root}` in a command path against the variant root.
pub fn expand_root(template: &str, root: &Path) -> PathBuf {
  match template.strip_prefix(ROOT_PLACEHOLDER) {
    Some(rest) => {
      let rest = rest.trim_start_matches(['/', '\\']);
      if rest.is_empty() {
        root.to_path_buf()
      } else {
        rest.split(['/', '\\']).fold(root.to_path_buf(), |acc, part| acc.join(part))
      }
    }
    None => PathBuf::from(template),
  }
}

/// Persisted description of one package version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDefinition {
  pub name: String,
  pub version: String,
  /// Executables the package provides.
  pub tools: Vec<String>,
  /// Variant requirement lists, e.g. `[["platform-linux", "arch-x86_64"]]`.
  pub variants: Vec<Vec<String>>,
  pub commands: Vec<EnvCommand>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub post_commands: Option<Vec<EnvCommand>>,
  pub format_version: u32,
}

impl PackageDefinition {
  /// Load `package.json` from a package version directory.
  pub fn load(version_dir: &Path) -> Result<Self, PackageError> {
    let path = version_dir.join(PACKAGE_DEFINITION);
    let content = fs::read_to_string(&path).map_err(|e| {
      if e.kind() == io::ErrorKind::NotFound {
        PackageError::NotAPackage(version_dir.to_path_buf())
      } else {
        PackageError::Read { path: path.clone(), source: e }
      }
    })?;

    let definition: Self = serde_json::from_str(&content).map_err(PackageError::Parse)?;
    if definition.format_version != PACKAGE_FORMAT_VERSION {
      return Err(PackageError::UnsupportedVersion(definition.format_version));
    }
    Ok(definition)
  }

  /// Write `package.json` into `version_dir`.
  pub fn save(&self, version_dir: &Path) -> Result<PathBuf, PackageError> {
    let path = version_dir.join(PACKAGE_DEFINITION);
    let content = serde_json::to_string_pretty(self).map_err(PackageError::Serialize)?;
    fs::write(&path, content).map_err(|source| PackageError::Write {
      path: path.clone(),
      source,
    })?;
    Ok(path)
  }
}
