//! Builtin module location discovery.
//!
//! Each `(category, module)` pair is first looked up in a [`ModuleManifest`],
//! which says where the module's file usually lives relative to the
//! interpreter prefix. Only when that file is absent is the interpreter asked
//! directly, via `import <module>; print(<module>.__file__)`.
//!
//! A module that cannot be found either way is skipped with a warning. A
//! directory already recorded under one category is not recorded again.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::locate::ResolvedExecutable;
use crate::platform::Os;
use crate::process::ProcessBuilder;
use crate::version::ExtractedVersion;

pub const MANIFEST_VERSION: u32 = 1;

/// Expected locations of builtin modules, relative to the interpreter prefix.
///
/// On Unix the prefix is the parent of the executable's directory
/// (`/usr/bin/python3` gives `/usr`). On Windows it is the executable's own
/// directory. Templates may use `{major}` and `{minor}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleManifest {
  pub version: u32,
  pub modules: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
  pub module: String,
  pub unix: String,
  pub windows: String,
}

impl ModuleManifest {
  /// Standard CPython layout.
  pub fn python() -> Self {
    let entry = |module: &str, unix: &str, windows: &str| ManifestEntry {
      module: module.to_string(),
      unix: unix.to_string(),
      windows: windows.to_string(),
    };

    Self {
      version: MANIFEST_VERSION,
      modules: vec![
        entry("os", "lib/python{major}.{minor}/os.py", "Lib/os.py"),
        entry(
          "setuptools",
          "lib/python{major}.{minor}/site-packages/setuptools/__init__.py",
          "Lib/site-packages/setuptools/__init__.py",
        ),
      ],
    }
  }

  /// Where `module`'s file should be for this interpreter, if the manifest knows it.
  pub fn expected_file(
    &self,
    module: &str,
    exe: &ResolvedExecutable,
    version: &ExtractedVersion,
    os: Os,
  ) -> Option<PathBuf> {
    let entry = self.modules.iter().find(|e| e.module == module)?;

    let (prefix, template) = match os {
      Os::Windows => (exe.base_dir.as_path(), &entry.windows),
      Os::Linux | Os::MacOs => (exe.base_dir.parent()?, &entry.unix),
    };

    let semver = version.semver();
    let relative = template
      .replace("{major}", &semver.major.to_string())
      .replace("{minor}", &semver.minor.to_string());

    Some(prefix.join(relative))
  }
}

/// Category name to source directory, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuiltinModulePaths {
  entries: Vec<(String, PathBuf)>,
}

impl BuiltinModulePaths {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record `dir` under `category` unless another category already holds it.
  ///
  /// A category recorded again takes the new directory. Returns whether the
  /// entry was recorded.
  pub fn insert(&mut self, category: impl Into<String>, dir: impl Into<PathBuf>) -> bool {
    let category = category.into();
    let dir = dir.into();

    if let Some((existing, _)) = self.entries.iter().find(|(c, d)| *d == dir && *c != category) {
      debug!(category = %category, dir = ?dir, existing = %existing, "directory already recorded, dropping");
      return false;
    }
    self.set(category, dir);
    true
  }

  /// Record `dir` under `category` without checking other categories.
  pub fn set(&mut self, category: impl Into<String>, dir: impl Into<PathBuf>) {
    let category = category.into();
    let dir = dir.into();

    match self.entries.iter_mut().find(|(c, _)| *c == category) {
      Some((_, existing)) => *existing = dir,
      None => self.entries.push((category, dir)),
    }
  }

  pub fn get(&self, category: &str) -> Option<&Path> {
    self
      .entries
      .iter()
      .find(|(c, _)| c == category)
      .map(|(_, d)| d.as_path())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
    self.entries.iter().map(|(c, d)| (c.as_str(), d.as_path()))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// The directory a module is installed under.
///
/// A package reports `<root>/<module>/__init__.py`, so its directory is
/// stepped over to reach `<root>`.
pub fn module_root(file: &Path, module: &str) -> Option<PathBuf> {
  let dir = file.parent()?;
  if dir.file_name() == Some(OsStr::new(module)) {
    dir.parent().map(Path::to_path_buf)
  } else {
    Some(dir.to_path_buf())
  }
}

/// Locates builtin modules for one interpreter.
pub struct Introspector<'a> {
  exe: &'a ResolvedExecutable,
  version: &'a ExtractedVersion,
  manifest: Option<&'a ModuleManifest>,
  os: Os,
}

impl<'a> Introspector<'a> {
  pub fn new(exe: &'a ResolvedExecutable, version: &'a ExtractedVersion, os: Os) -> Self {
    Self {
      exe,
      version,
      manifest: None,
      os,
    }
  }

  pub fn with_manifest(mut self, manifest: &'a ModuleManifest) -> Self {
    self.manifest = Some(manifest);
    self
  }

  /// Discover the directory of each `(category, module)` pair.
  ///
  /// On platforms with a separate dynamic library directory it is appended
  /// afterwards, whether or not it exists.
  pub fn discover(&self, entries: &[(&str, &str)]) -> BuiltinModulePaths {
    let mut paths = BuiltinModulePaths::new();

    for (category, module) in entries {
      let Some(file) = self.locate_module(module) else {
        continue;
      };
      let Some(dir) = module_root(&file, module) else {
        warn!(module, file = ?file, "module file has no parent directory, skipping");
        continue;
      };
      if paths.insert(*category, &dir) {
        info!(category, module, dir = ?dir, "found builtin module");
      }
    }

    if let Some(dll_dir) = self.os.dll_dir_name() {
      paths.set(dll_dir, self.exe.base_dir.join(dll_dir));
    }

    paths
  }

  fn locate_module(&self, module: &str) -> Option<PathBuf> {
    if let Some(manifest) = self.manifest
      && let Some(expected) = manifest.expected_file(module, self.exe, self.version, self.os)
    {
      if expected.is_file() {
        debug!(module, file = ?expected, "module found at manifest location");
        return Some(expected);
      }
      debug!(module, file = ?expected, "manifest location missing, probing");
    }

    self.probe_module(module)
  }

  fn probe_module(&self, module: &str) -> Option<PathBuf> {
    let script = format!("import {module}\nprint({module}.__file__)");

    let output = match ProcessBuilder::new(&self.exe.path)
      .arg("-c")
      .arg(&script)
      .spawn()
      .and_then(|handle| handle.read())
    {
      Ok(output) => output,
      Err(e) => {
        warn!(module, error = %e, "module probe could not run, skipping");
        return None;
      }
    };

    if !output.success() {
      warn!(
        module,
        status = %output.status,
        stderr = %output.stderr.as_text().trim(),
        "module probe failed, skipping"
      );
      return None;
    }

    let stdout = output.stdout.as_text();
    let reported = stdout.trim();
    if reported.is_empty() {
      warn!(module, "module probe printed nothing, skipping");
      return None;
    }

    Some(PathBuf::from(reported))
  }
}
