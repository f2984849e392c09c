//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own host prefix (where the stub interpreter lives) and
/// install path.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Prefix of the fake host installation.
  pub fn prefix(&self) -> PathBuf {
    let p = self.temp.path().join("host");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn bin_dir(&self) -> PathBuf {
    self.prefix().join("bin")
  }

  /// Install path for bound packages.
  pub fn install_path(&self) -> PathBuf {
    let p = self.temp.path().join("pkgs");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Write a file relative to the host prefix.
  pub fn write_host_file(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.prefix().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }

  /// Write a stub `python` that reports `version` and resolves `modules`.
  pub fn stub_python(&self, version: &str, modules: &[(&str, PathBuf)]) -> PathBuf {
    let mut script = String::from("#!/bin/sh\ncase \"$2\" in\n");
    script.push_str(&format!("  *version_info*) echo '{}' ;;\n", version));
    for (module, file) in modules {
      script.push_str(&format!("  \"import {}\"*) echo '{}' ;;\n", module, file.display()));
    }
    script.push_str("  *) echo 'ImportError' >&2; exit 1 ;;\nesac\n");

    let bin = self.bin_dir();
    std::fs::create_dir_all(&bin).unwrap();
    let path = bin.join("python");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  /// Package version directory for `version` of the bound python.
  pub fn package_dir(&self, version: &str) -> PathBuf {
    self.install_path().join("python").join(version)
  }

  /// A `pkgbind` command with an isolated install path and search path.
  pub fn pkgbind_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("pkgbind");
    cmd.env("PKGBIND_PACKAGES_PATH", self.install_path());
    cmd.env("XDG_DATA_HOME", self.temp.path().join("data"));
    cmd.env_remove("PKGBIND_SEARCH_PATH");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
