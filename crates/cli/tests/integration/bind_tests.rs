//! Bind command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn bind_python_with_exe_override() {
  let env = TestEnv::new();
  let os_py = env.write_host_file("lib/python3.11/os.py", "# os");
  let exe = env.stub_python("3.11.4", &[("os", os_py)]);

  env
    .pkgbind_cmd()
    .args(["bind", "python", "--exe"])
    .arg(&exe)
    .assert()
    .success()
    .stdout(predicate::str::contains("Bound python 3.11.4"));

  let package_dir = env.package_dir("3.11.4");
  assert!(package_dir.join("package.json").is_file());
}

#[test]
fn bind_python_json_output() {
  let env = TestEnv::new();
  let exe = env.stub_python("3.12.1", &[]);

  let output = env
    .pkgbind_cmd()
    .args(["bind", "python", "-o", "json", "--exe"])
    .arg(&exe)
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["name"], "python");
  assert_eq!(json["version"], "3.12.1");

  let root = std::path::PathBuf::from(json["root"].as_str().unwrap());
  assert!(root.join("bin").join("python").is_file());
  assert!(!root.join("python").exists());
}

#[test]
fn bind_python_found_on_search_path() {
  let env = TestEnv::new();
  env.stub_python("3.10.13", &[]);

  env
    .pkgbind_cmd()
    .env("PATH", "/nonexistent")
    .args(["bind", "python", "--search-path"])
    .arg(env.bin_dir())
    .assert()
    .success()
    .stdout(predicate::str::contains("3.10.13"));
}

#[test]
fn bind_python_outside_range_fails() {
  let env = TestEnv::new();
  let exe = env.stub_python("3.11.4", &[]);

  env
    .pkgbind_cmd()
    .args(["bind", "python", "--range", ">=3.12", "--exe"])
    .arg(&exe)
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not satisfy"));

  assert!(!env.install_path().join("python").exists());
}

#[test]
fn rebind_needs_force() {
  let env = TestEnv::new();
  let exe = env.stub_python("3.11.4", &[]);

  env.pkgbind_cmd().args(["bind", "python", "--exe"]).arg(&exe).assert().success();

  env
    .pkgbind_cmd()
    .args(["bind", "python", "--exe"])
    .arg(&exe)
    .assert()
    .failure()
    .stderr(predicate::str::contains("already installed"));

  env
    .pkgbind_cmd()
    .args(["bind", "python", "--force", "--exe"])
    .arg(&exe)
    .assert()
    .success();
}
