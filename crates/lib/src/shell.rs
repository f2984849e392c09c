//! Shell detection and activation script syntax

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported shell types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  PowerShell,
  Sh,
}

impl Shell {
  /// Detect the current shell from environment
  ///
  /// Checks `$SHELL`, falls back to PowerShell on Windows and `sh` elsewhere.
  pub fn detect() -> Self {
    if let Ok(shell) = env::var("SHELL") {
      let shell_name = PathBuf::from(&shell)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

      return Self::from_name(&shell_name).unwrap_or_else(|| {
        if shell_name.contains("zsh") {
          Shell::Zsh
        } else if shell_name.contains("bash") {
          Shell::Bash
        } else if shell_name.contains("fish") {
          Shell::Fish
        } else {
          Shell::Sh
        }
      });
    }

    #[cfg(target_os = "windows")]
    return Shell::PowerShell;

    #[cfg(not(target_os = "windows"))]
    Shell::Sh
  }

  fn from_name(name: &str) -> Option<Self> {
    match name {
      "zsh" => Some(Shell::Zsh),
      "bash" => Some(Shell::Bash),
      "fish" => Some(Shell::Fish),
      "sh" => Some(Shell::Sh),
      "pwsh" | "powershell" => Some(Shell::PowerShell),
      _ => None,
    }
  }

  /// Get the shell name as a string
  pub fn as_str(&self) -> &'static str {
    match self {
      Shell::Bash => "bash",
      Shell::Zsh => "zsh",
      Shell::Fish => "fish",
      Shell::PowerShell => "powershell",
      Shell::Sh => "sh",
    }
  }

  /// Statement that puts `value` in front of the PATH-like variable `name`.
  ///
  /// An unset or empty variable does not leave a dangling separator.
  pub fn prepend_path(&self, name: &str, value: &str) -> String {
    match self {
      Shell::Fish => format!("set -gx {} {} ${}", name, fish_quote(value), name),
      Shell::PowerShell => format!(
        "$env:{name} = (@({}, $env:{name}) | Where-Object {{ $_ }}) -join [IO.Path]::PathSeparator",
        ps_quote(value)
      ),
      Shell::Bash | Shell::Zsh | Shell::Sh => {
        format!("export {name}={}${{{name}:+:${name}}}", sh_quote(value))
      }
    }
  }

  /// Statement that puts `value` after the PATH-like variable `name`.
  pub fn append_path(&self, name: &str, value: &str) -> String {
    match self {
      Shell::Fish => format!("set -gx {} ${} {}", name, name, fish_quote(value)),
      Shell::PowerShell => format!(
        "$env:{name} = (@($env:{name}, {}) | Where-Object {{ $_ }}) -join [IO.Path]::PathSeparator",
        ps_quote(value)
      ),
      Shell::Bash | Shell::Zsh | Shell::Sh => {
        format!("export {name}=${{{name}:+${name}:}}{}", sh_quote(value))
      }
    }
  }

  /// Generate a comment for this shell
  pub fn comment(&self, text: &str) -> String {
    format!("# {}", text)
  }

  /// Generate the script header/shebang
  pub fn header(&self) -> &'static str {
    match self {
      Shell::Bash => "#!/usr/bin/env bash",
      Shell::Zsh => "#!/usr/bin/env zsh",
      Shell::Fish => "# Fish shell environment",
      Shell::PowerShell => "# PowerShell environment",
      Shell::Sh => "#!/bin/sh",
    }
  }
}

impl fmt::Display for Shell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Shell {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_name(&s.to_lowercase()).ok_or_else(|| format!("unsupported shell '{s}'"))
  }
}

fn sh_quote(value: &str) -> String {
  let mut quoted = String::with_capacity(value.len() + 2);
  quoted.push('"');
  for c in value.chars() {
    if matches!(c, '"' | '\\' | '$' | '`') {
      quoted.push('\\');
    }
    quoted.push(c);
  }
  quoted.push('"');
  quoted
}

fn fish_quote(value: &str) -> String {
  let mut quoted = String::with_capacity(value.len() + 2);
  quoted.push('"');
  for c in value.chars() {
    if matches!(c, '"' | '\\' | '$') {
      quoted.push('\\');
    }
    quoted.push(c);
  }
  quoted.push('"');
  quoted
}

fn ps_quote(value: &str) -> String {
  format!("'{}'", value.replace('\'', "''"))
}
