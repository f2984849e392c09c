//! All-or-nothing package creation.
//!
//! # Layout
//!
//! ```text
//! <install_path>/
//! ├── .pkgbind-staging-XXXXXX/      # only while a package is being made
//! └── <name>/<version>/
//!     ├── package.json
//!     └── platform-<os>/arch-<arch>/  # variant root
//! ```
//!
//! Everything is built inside a staging directory next to the final location
//! and moved into place with one rename. If anything fails before that, the
//! staging directory is removed and no package appears.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::definition::{EnvCommand, PACKAGE_FORMAT_VERSION, PackageDefinition};
use super::PackageError;
use crate::platform::Platform;

const STAGING_PREFIX: &str = ".pkgbind-staging-";

/// Everything the maker needs to know about a package before its payload exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
  pub name: String,
  pub version: String,
  pub tools: Vec<String>,
  pub commands: Vec<EnvCommand>,
  pub post_commands: Option<Vec<EnvCommand>>,
  pub variant: Platform,
}

impl PackageRecord {
  pub fn definition(&self) -> PackageDefinition {
    PackageDefinition {
      name: self.name.clone(),
      version: self.version.clone(),
      tools: self.tools.clone(),
      variants: vec![self.variant.requirements()],
      commands: self.commands.clone(),
      post_commands: self.post_commands.clone(),
      format_version: PACKAGE_FORMAT_VERSION,
    }
  }
}

/// A package that has been registered under an install path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
  pub name: String,
  pub version: String,
  pub variant: Platform,
  /// `<install_path>/<name>/<version>`
  pub version_dir: PathBuf,
  /// The directory the payload was written to.
  pub variant_root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PackageMaker {
  install_path: PathBuf,
  force: bool,
}

impl PackageMaker {
  pub fn new(install_path: impl Into<PathBuf>) -> Self {
    Self {
      install_path: install_path.into(),
      force: false,
    }
  }

  /// Replace an existing package of the same name and version.
  pub fn force(mut self, force: bool) -> Self {
    self.force = force;
    self
  }

  pub fn install_path(&self) -> &Path {
    &self.install_path
  }

  /// Final directory of `name`/`version` under this install path.
  pub fn version_dir(&self, name: &str, version: &str) -> PathBuf {
    self.install_path.join(name).join(version)
  }

  /// Create the package described by `record`.
  ///
  /// `materialize` receives the (staged) variant root and writes the payload.
  /// Its error aborts the whole package.
  pub fn make<F>(&self, record: &PackageRecord, materialize: F) -> Result<InstalledPackage, PackageError>
  where
    F: FnOnce(&Path) -> Result<(), PackageError>,
  {
    validate_component("name", &record.name)?;
    validate_component("version", &record.version)?;

    let target = self.version_dir(&record.name, &record.version);
    if target.exists() && !self.force {
      return Err(PackageError::Exists(target));
    }

    fs::create_dir_all(&self.install_path).map_err(|source| PackageError::CreateDir {
      path: self.install_path.clone(),
      source,
    })?;

    let staging = tempfile::Builder::new()
      .prefix(STAGING_PREFIX)
      .tempdir_in(&self.install_path)
      .map_err(|source| PackageError::CreateDir {
        path: self.install_path.clone(),
        source,
      })?;

    let staged_version = staging.path().join(&record.version);
    let variant_subpath = record.variant.variant_subpath();
    let staged_root = staged_version.join(&variant_subpath);
    fs::create_dir_all(&staged_root).map_err(|source| PackageError::CreateDir {
      path: staged_root.clone(),
      source,
    })?;

    info!(
      name = %record.name,
      version = %record.version,
      variant = %record.variant,
      staging = %staging.path().display(),
      "making package"
    );

    if let Err(e) = materialize(&staged_root) {
      warn!(name = %record.name, version = %record.version, error = %e, "materialization failed, discarding staged package");
      return Err(e);
    }

    record.definition().save(&staged_version)?;

    let family_dir = self.install_path.join(&record.name);
    fs::create_dir_all(&family_dir).map_err(|source| PackageError::CreateDir {
      path: family_dir.clone(),
      source,
    })?;

    if target.exists() {
      if !self.force {
        return Err(PackageError::Exists(target));
      }
      debug!(path = %target.display(), "removing existing package version");
      fs::remove_dir_all(&target).map_err(|source| PackageError::Remove {
        path: target.clone(),
        source,
      })?;
    }

    fs::rename(&staged_version, &target).map_err(|source| PackageError::Rename {
      from: staged_version.clone(),
      to: target.clone(),
      source,
    })?;

    let variant_root = target.join(&variant_subpath);
    info!(name = %record.name, version = %record.version, root = %variant_root.display(), "package registered");

    Ok(InstalledPackage {
      name: record.name.clone(),
      version: record.version.clone(),
      variant: record.variant,
      version_dir: target,
      variant_root,
    })
  }
}

/// Names and versions become single path components.
fn validate_component(kind: &'static str, value: &str) -> Result<(), PackageError> {
  let invalid = value.is_empty()
    || value == "."
    || value == ".."
    || value.starts_with('.')
    || value.contains(['/', '\\']);
  if invalid {
    return Err(PackageError::InvalidComponent {
      kind,
      value: value.to_string(),
    });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::{Arch, Os};
  use tempfile::TempDir;

  fn record() -> PackageRecord {
    PackageRecord {
      name: "python".to_string(),
      version: "3.11.4".to_string(),
      tools: vec!["python".to_string()],
      commands: Vec::new(),
      post_commands: None,
      variant: Platform::new(Arch::X86_64, Os::Linux),
    }
  }

  fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
      .unwrap()
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }

  #[test]
  fn make_registers_package_layout() {
    let temp = TempDir::new().unwrap();
    let maker = PackageMaker::new(temp.path());

    let installed = maker
      .make(&record(), |root| {
        fs::create_dir_all(root.join("bin")).unwrap();
        fs::write(root.join("bin").join("python"), "exe").unwrap();
        Ok(())
      })
      .unwrap();

    let version_dir = temp.path().join("python").join("3.11.4");
    assert_eq!(installed.version_dir, version_dir);
    assert_eq!(
      installed.variant_root,
      version_dir.join("platform-linux").join("arch-x86_64")
    );
    assert!(installed.variant_root.join("bin").join("python").is_file());

    let definition = PackageDefinition::load(&version_dir).unwrap();
    assert_eq!(definition.variants, vec![vec!["platform-linux", "arch-x86_64"]]);

    // staging directory is gone
    assert_eq!(entries(temp.path()), vec!["python"]);
  }

  #[test]
  fn failed_materialization_leaves_nothing() {
    let temp = TempDir::new().unwrap();
    let maker = PackageMaker::new(temp.path());

    let result = maker.make(&record(), |root| {
      fs::write(root.join("partial"), "half-written").unwrap();
      Err(PackageError::NotAPackage(root.to_path_buf()))
    });

    assert!(result.is_err());
    assert!(entries(temp.path()).is_empty());
  }

  #[test]
  fn existing_version_is_refused() {
    let temp = TempDir::new().unwrap();
    let maker = PackageMaker::new(temp.path());
    maker.make(&record(), |_| Ok(())).unwrap();

    let mut called = false;
    let result = maker.make(&record(), |_| {
      called = true;
      Ok(())
    });

    assert!(matches!(result, Err(PackageError::Exists(_))));
    assert!(!called);
  }

  #[test]
  fn force_replaces_existing_version() {
    let temp = TempDir::new().unwrap();
    PackageMaker::new(temp.path())
      .make(&record(), |root| {
        fs::write(root.join("old"), "old").unwrap();
        Ok(())
      })
      .unwrap();

    let installed = PackageMaker::new(temp.path())
      .force(true)
      .make(&record(), |root| {
        fs::write(root.join("new"), "new").unwrap();
        Ok(())
      })
      .unwrap();

    assert!(installed.variant_root.join("new").exists());
    assert!(!installed.variant_root.join("old").exists());
  }

  #[test]
  fn failed_forced_rebind_keeps_old_version() {
    let temp = TempDir::new().unwrap();
    let first = PackageMaker::new(temp.path())
      .make(&record(), |root| {
        fs::write(root.join("old"), "old").unwrap();
        Ok(())
      })
      .unwrap();

    let result = PackageMaker::new(temp.path())
      .force(true)
      .make(&record(), |root| Err(PackageError::NotAPackage(root.to_path_buf())));

    assert!(result.is_err());
    assert!(first.variant_root.join("old").exists());
  }

  #[test]
  fn path_like_versions_are_rejected() {
    let temp = TempDir::new().unwrap();
    let mut bad = record();
    bad.version = "../escape".to_string();

    let result = PackageMaker::new(temp.path()).make(&bad, |_| Ok(()));
    assert!(matches!(result, Err(PackageError::InvalidComponent { kind: "version", .. })));
  }
}
