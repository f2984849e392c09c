//! CLI smoke tests for pkgbind.
//!
//! These tests verify that commands parse, run without panicking and return
//! appropriate exit codes. They never touch a real interpreter.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

fn pkgbind_cmd() -> Command {
  cargo_bin_cmd!("pkgbind")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  pkgbind_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  pkgbind_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("pkgbind"));
}

#[test]
fn subcommand_help_works() {
  for args in [&["bind"][..], &["bind", "python"], &["env"], &["info"]] {
    pkgbind_cmd()
      .args(args)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn bind_python_help_lists_exe_override() {
  pkgbind_cmd()
    .args(["bind", "python", "--help"])
    .assert()
    .success()
    .stdout(predicate::str::contains("--exe"));
}

// =============================================================================
// info
// =============================================================================

#[test]
#[serial]
fn info_shows_platform() {
  pkgbind_cmd()
    .arg("info")
    .assert()
    .success()
    .stdout(predicate::str::contains("Platform"));
}

#[test]
#[serial]
fn info_reports_packages_path_override() {
  let temp = TempDir::new().unwrap();

  pkgbind_cmd()
    .args(["info", "-o", "json"])
    .env("PKGBIND_PACKAGES_PATH", temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("\"packages_path\""))
    .stdout(predicate::str::contains(temp.path().to_string_lossy().as_ref()));
}

// =============================================================================
// Error Handling
// =============================================================================

#[test]
fn unknown_bind_target_fails() {
  pkgbind_cmd().args(["bind", "ruby"]).assert().failure();
}

#[test]
#[serial]
fn bind_with_invalid_range_fails() {
  let temp = TempDir::new().unwrap();

  pkgbind_cmd()
    .args(["bind", "python", "--range", "not a range", "--exe"])
    .arg(temp.path().join("python"))
    .arg("--install-path")
    .arg(temp.path().join("pkgs"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid version range"));
}

#[test]
fn env_on_missing_package_fails() {
  let temp = TempDir::new().unwrap();

  pkgbind_cmd()
    .arg("env")
    .arg(temp.path().join("python").join("3.11.4"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a package version directory"));
}
