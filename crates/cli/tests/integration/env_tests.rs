//! Env command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

fn bind(env: &TestEnv) {
  let os_py = env.write_host_file("stdlib/os.py", "# os");
  let exe = env.stub_python("3.11.4", &[("os", os_py)]);
  env.pkgbind_cmd().args(["bind", "python", "--exe"]).arg(&exe).assert().success();
}

#[test]
fn env_prints_path_and_pythonpath() {
  let env = TestEnv::new();
  bind(&env);

  env
    .pkgbind_cmd()
    .arg("env")
    .arg(env.package_dir("3.11.4"))
    .args(["--shell", "sh"])
    .assert()
    .success()
    .stdout(predicate::str::contains("export PATH="))
    .stdout(predicate::str::contains("/bin\"${PATH:+:$PATH}"))
    .stdout(predicate::str::contains("export PYTHONPATH="))
    .stdout(predicate::str::contains("/python/lib\""));
}

#[test]
fn env_capability_disables_commands() {
  let env = TestEnv::new();
  bind(&env);

  env
    .pkgbind_cmd()
    .arg("env")
    .arg(env.package_dir("3.11.4"))
    .args(["--shell", "sh", "--capability", "dcc_python=1"])
    .assert()
    .success()
    .stdout(predicate::str::contains("export").not())
    .stderr(predicate::str::contains("No environment changes"));
}

#[test]
fn env_fish_syntax() {
  let env = TestEnv::new();
  bind(&env);

  env
    .pkgbind_cmd()
    .arg("env")
    .arg(env.package_dir("3.11.4"))
    .args(["--shell", "fish"])
    .assert()
    .success()
    .stdout(predicate::str::contains("set -gx PATH"));
}

#[test]
fn env_missing_variant_fails() {
  let env = TestEnv::new();
  bind(&env);

  env
    .pkgbind_cmd()
    .arg("env")
    .arg(env.package_dir("3.11.4"))
    .args(["--variant", "platform-plan9/arch-mips"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not installed"));
}

#[test]
fn env_rejects_bad_capability() {
  let env = TestEnv::new();
  bind(&env);

  env
    .pkgbind_cmd()
    .arg("env")
    .arg(env.package_dir("3.11.4"))
    .args(["--capability", "dcc_python"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("NAME=RANGE"));
}
