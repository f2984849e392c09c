//! Executable location.
//!
//! An explicit override wins and is used as given, made absolute against the
//! working directory. Otherwise each candidate name is looked up in order over
//! `PATH` plus the extra [`SearchPath`] directories, and the first hit wins.

mod search_path;

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

pub use search_path::{SearchPath, SearchPathGuard};

#[derive(Debug, Error)]
pub enum LocateError {
  #[error("could not find executable '{}' on the search path", .names.join("' or '"))]
  NotFound { names: Vec<String> },

  #[error("executable path {path} has no parent directory")]
  NoParent { path: PathBuf },

  #[error("failed to resolve {path}: {source}")]
  Resolve {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// An interpreter binary found on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
  /// Absolute path to the binary.
  pub path: PathBuf,
  /// Directory that contains the binary.
  pub base_dir: PathBuf,
}

impl ResolvedExecutable {
  fn from_path(path: PathBuf) -> Result<Self, LocateError> {
    let base_dir = path
      .parent()
      .map(Path::to_path_buf)
      .ok_or_else(|| LocateError::NoParent { path: path.clone() })?;
    Ok(Self { path, base_dir })
  }
}

/// Find the first of `names` on the search path, unless `exe_override` names the binary.
pub fn locate_executable(
  names: &[&str],
  exe_override: Option<&Path>,
  search: &SearchPath,
) -> Result<ResolvedExecutable, LocateError> {
  if let Some(path) = exe_override {
    let absolute = std::path::absolute(path).map_err(|source| LocateError::Resolve {
      path: path.to_path_buf(),
      source,
    })?;
    let absolute = dunce::simplified(&absolute).to_path_buf();
    info!(path = ?absolute, "using executable override");
    return ResolvedExecutable::from_path(absolute);
  }

  let lookup = search.lookup_list();
  let cwd = env::current_dir().unwrap_or_default();

  for name in names {
    match which::which_in(name, lookup.as_ref(), &cwd) {
      Ok(found) => {
        let found = dunce::simplified(&found).to_path_buf();
        info!(candidate = name, path = ?found, "found executable");
        return ResolvedExecutable::from_path(found);
      }
      Err(e) => debug!(candidate = name, error = %e, "candidate not found"),
    }
  }

  Err(LocateError::NotFound {
    names: names.iter().map(|n| n.to_string()).collect(),
  })
}
