//! Package activation.
//!
//! Turns the environment commands stored in a [`PackageDefinition`] into
//! concrete [`EnvMutation`]s for one variant root, honoring the caller's
//! [`Capabilities`], and renders them as a shell script.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::package::{EnvCommand, NoopToggle, PackageDefinition, expand_root};
use crate::shell::Shell;
use crate::version::{VersionError, VersionRange, parse_lenient};

#[derive(Debug, Error)]
pub enum ActivateError {
  #[error("invalid range for capability '{name}': {source}")]
  Capability {
    name: String,
    #[source]
    source: VersionError,
  },

  #[error("capability value '{value}' for '{name}' is not a version")]
  CapabilityValue { name: String, value: String },

  #[error("expected NAME=RANGE, got '{0}'")]
  Assignment(String),

  #[error("failed to list {path}: {source}")]
  ReadDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Caller-side capability ranges, keyed by toggle name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(BTreeMap<String, String>);

impl Capabilities {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&mut self, name: impl Into<String>, range: impl Into<String>) {
    self.0.insert(name.into(), range.into());
  }

  pub fn with(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
    self.set(name, range);
    self
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  /// Parse a `NAME=RANGE` assignment and record it.
  pub fn assign(&mut self, assignment: &str) -> Result<(), ActivateError> {
    match assignment.split_once('=') {
      Some((name, range)) if !name.trim().is_empty() && !range.trim().is_empty() => {
        self.set(name.trim(), range.trim());
        Ok(())
      }
      _ => Err(ActivateError::Assignment(assignment.to_string())),
    }
  }

  /// Whether `value` falls in the range held for `name`, or in `default` if none is held.
  pub fn intersects(&self, name: &str, default: &str, value: &str) -> Result<bool, ActivateError> {
    let raw = self.get(name).unwrap_or(default);
    let range = VersionRange::parse(raw).map_err(|source| ActivateError::Capability {
      name: name.to_string(),
      source,
    })?;
    let version = parse_lenient(value).ok_or_else(|| ActivateError::CapabilityValue {
      name: name.to_string(),
      value: value.to_string(),
    })?;
    Ok(range.contains(&version))
  }

  fn is_noop(&self, toggle: &NoopToggle) -> Result<bool, ActivateError> {
    self.intersects(&toggle.name, &toggle.default, &toggle.value)
  }
}

/// A single change to a PATH-like variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EnvMutation {
  Prepend { var: String, value: PathBuf },
  Append { var: String, value: PathBuf },
}

impl EnvMutation {
  pub fn var(&self) -> &str {
    match self {
      EnvMutation::Prepend { var, .. } | EnvMutation::Append { var, .. } => var,
    }
  }
}

/// Evaluate `commands` then `post_commands` for the variant at `root`.
pub fn activate(
  definition: &PackageDefinition,
  root: &Path,
  caps: &Capabilities,
) -> Result<Vec<EnvMutation>, ActivateError> {
  let mut mutations = Vec::new();
  let post = definition.post_commands.iter().flatten();

  for command in definition.commands.iter().chain(post) {
    if let Some(toggle) = command.toggle()
      && caps.is_noop(toggle)?
    {
      debug!(toggle = %toggle.name, "capability toggle set, skipping command");
      continue;
    }
    evaluate(command, root, &mut mutations)?;
  }

  Ok(mutations)
}

fn evaluate(command: &EnvCommand, root: &Path, out: &mut Vec<EnvMutation>) -> Result<(), ActivateError> {
  match command {
    EnvCommand::PrependPath { var, path, .. } => out.push(EnvMutation::Prepend {
      var: var.clone(),
      value: expand_root(path, root),
    }),
    EnvCommand::AppendSubdirs { var, dir, .. } => {
      for subdir in subdirs(&expand_root(dir, root))? {
        out.push(EnvMutation::Append {
          var: var.clone(),
          value: subdir,
        });
      }
    }
  }
  Ok(())
}

/// Immediate subdirectories of `dir` in name order. A missing `dir` has none.
fn subdirs(dir: &Path) -> Result<Vec<PathBuf>, ActivateError> {
  let read_err = |source| ActivateError::ReadDir {
    path: dir.to_path_buf(),
    source,
  };

  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      trace!(dir = %dir.display(), "no such directory, nothing to append");
      return Ok(Vec::new());
    }
    Err(e) => return Err(read_err(e)),
  };

  let mut dirs = Vec::new();
  for entry in entries {
    let path = entry.map_err(read_err)?.path();
    if path.is_dir() {
      dirs.push(path);
    }
  }
  dirs.sort();
  Ok(dirs)
}

/// Render `mutations` as a script for `shell` to source.
pub fn render_script(mutations: &[EnvMutation], shell: Shell) -> String {
  let mut lines = vec![shell.header().to_string(), shell.comment("generated by pkgbind")];

  for mutation in mutations {
    let line = match mutation {
      EnvMutation::Prepend { var, value } => shell.prepend_path(var, &value.to_string_lossy()),
      EnvMutation::Append { var, value } => shell.append_path(var, &value.to_string_lossy()),
    };
    lines.push(line);
  }

  let mut script = lines.join("\n");
  script.push('\n');
  script
}
