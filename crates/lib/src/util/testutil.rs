//! Test utilities for pkgbind-lib.
//!
//! Cross-platform helpers for tests that launch processes, plus a stub
//! interpreter generator for exercising the binding flow without a real
//! Python installation.

use std::path::{Path, PathBuf};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to echo a message.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("/bin/echo", vec![msg.to_string()])
}

#[cfg(windows)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), format!("echo {}", msg)])
}

/// A POSIX shell script that answers interpreter probes with canned output.
///
/// The version probe (any `-c` script mentioning `version_info`) prints the
/// configured version. A module probe (`-c` script starting with
/// `import <module>`) prints the configured file path, or exits 1 with an
/// `ImportError` when the module is not configured.
#[cfg(unix)]
#[derive(Debug, Clone)]
pub struct StubInterpreter {
  version_output: String,
  version_exit: i32,
  modules: Vec<(String, PathBuf)>,
}

#[cfg(unix)]
impl StubInterpreter {
  pub fn new(version_output: &str) -> Self {
    Self {
      version_output: version_output.to_string(),
      version_exit: 0,
      modules: Vec::new(),
    }
  }

  /// Make the version probe exit with `code`.
  pub fn version_exit(mut self, code: i32) -> Self {
    self.version_exit = code;
    self
  }

  /// Report `file` as the location of `module`.
  pub fn module(mut self, module: &str, file: impl Into<PathBuf>) -> Self {
    self.modules.push((module.to_string(), file.into()));
    self
  }

  /// Render the script body.
  pub fn script(&self) -> String {
    let mut script = String::from("#!/bin/sh\nif [ \"$1\" != \"-c\" ]; then\n  exit 2\nfi\ncase \"$2\" in\n");
    script.push_str(&format!(
      "  *version_info*)\n    echo '{}'\n    exit {}\n    ;;\n",
      self.version_output, self.version_exit
    ));
    for (module, file) in &self.modules {
      script.push_str(&format!(
        "  \"import {}\"*)\n    echo '{}'\n    ;;\n",
        module,
        file.display()
      ));
    }
    script.push_str("  *)\n    echo 'ImportError: no such module' >&2\n    exit 1\n    ;;\nesac\n");
    script
  }

  /// Write the stub as an executable named `name` inside `dir`.
  pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, self.script()).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }
}
