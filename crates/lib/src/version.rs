//! Version extraction and gating.
//!
//! [`extract_version`] runs a probe script through the interpreter and takes
//! whatever it prints as the version. [`VersionRange`] wraps a `semver`
//! requirement, and versions are compared leniently: `3.11` reads as `3.11.0`
//! and anything after the last leading numeric component is ignored.

use std::fmt;
use std::path::Path;
use std::process::ExitStatus;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::process::{ProcessBuilder, ProcessError};

#[derive(Debug, Error)]
pub enum VersionError {
  #[error(transparent)]
  Process(#[from] ProcessError),

  #[error("version probe exited with {status}: {stderr}")]
  ProbeFailed { status: ExitStatus, stderr: String },

  #[error("could not parse a version from probe output {output:?}")]
  Unparsable { output: String },

  #[error("invalid version range '{range}': {source}")]
  InvalidRange {
    range: String,
    #[source]
    source: semver::Error,
  },

  #[error("version {version} is outside the accepted range '{range}'")]
  Mismatch { version: String, range: String },
}

/// A dotted version string as printed by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedVersion(String);

impl ExtractedVersion {
  /// Validate probe output. Surrounding whitespace is stripped.
  pub fn parse(output: &str) -> Result<Self, VersionError> {
    let trimmed = output.trim();
    let unparsable = || VersionError::Unparsable {
      output: output.to_string(),
    };

    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
      return Err(unparsable());
    }
    parse_lenient(trimmed).ok_or_else(unparsable)?;
    Ok(Self(trimmed.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// The comparable form of this version.
  pub fn semver(&self) -> Version {
    // validated in `parse`
    parse_lenient(&self.0).unwrap_or_else(|| Version::new(0, 0, 0))
  }
}

impl fmt::Display for ExtractedVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Parse up to three leading numeric components, padding the rest with zeros.
///
/// Returns `None` unless the first component is numeric.
pub fn parse_lenient(s: &str) -> Option<Version> {
  let mut parts = [0u64; 3];
  let mut seen = 0;

  for component in s.split('.') {
    if seen == parts.len() {
      break;
    }
    match component.parse::<u64>() {
      Ok(n) => {
        parts[seen] = n;
        seen += 1;
      }
      Err(_) => break,
    }
  }

  if seen == 0 {
    return None;
  }
  Some(Version::new(parts[0], parts[1], parts[2]))
}

/// An accepted version range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
  raw: String,
  req: VersionReq,
}

impl VersionRange {
  pub fn parse(raw: &str) -> Result<Self, VersionError> {
    let req = VersionReq::parse(&with_exact_default(raw)).map_err(|source| VersionError::InvalidRange {
      range: raw.to_string(),
      source,
    })?;
    Ok(Self {
      raw: raw.to_string(),
      req,
    })
  }

  pub fn as_str(&self) -> &str {
    &self.raw
  }

  pub fn contains(&self, version: &Version) -> bool {
    self.req.matches(version)
  }
}

/// Comparators without an operator match the named release family only, so
/// `3.11` is `=3.11` (`>=3.11.0, <3.12.0`) rather than semver's caret default.
fn with_exact_default(raw: &str) -> String {
  raw
    .split(',')
    .map(|part| {
      let part = part.trim();
      let wildcard = part.contains(['*', 'x', 'X']);
      if part.starts_with(|c: char| c.is_ascii_digit()) && !wildcard {
        format!("={part}")
      } else {
        part.to_string()
      }
    })
    .collect::<Vec<_>>()
    .join(", ")
}

impl fmt::Display for VersionRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

/// Run `probe_script` with `exe -c` and parse what it prints.
pub fn extract_version(exe: &Path, probe_script: &str) -> Result<ExtractedVersion, VersionError> {
  let output = ProcessBuilder::new(exe).arg("-c").arg(probe_script).spawn()?.read()?;

  let stdout = output.stdout.as_text();
  debug!(exe = ?exe, stdout = %stdout.trim(), "version probe finished");

  if !output.success() {
    return Err(VersionError::ProbeFailed {
      status: output.status,
      stderr: output.stderr.as_text().trim().to_string(),
    });
  }

  let version = ExtractedVersion::parse(&stdout)?;
  info!(exe = ?exe, version = %version, "extracted version");
  Ok(version)
}

/// Fail unless `version` falls inside `range`. No range accepts everything.
pub fn check_version(version: &ExtractedVersion, range: Option<&VersionRange>) -> Result<(), VersionError> {
  let Some(range) = range else {
    return Ok(());
  };

  if range.contains(&version.semver()) {
    debug!(version = %version, range = %range, "version accepted");
    Ok(())
  } else {
    Err(VersionError::Mismatch {
      version: version.to_string(),
      range: range.to_string(),
    })
  }
}
