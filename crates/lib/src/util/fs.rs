//! Filesystem copy helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CopyError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to traverse {path}: {source}")]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },

  #[error("failed to copy {from} to {to}: {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Copy every regular file directly inside `src_dir` into `dest_dir`.
///
/// Subdirectories are skipped. Symlinks to files are followed. `dest_dir` must
/// exist. Returns the destination paths in name order.
pub fn copy_files_flat(src_dir: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>, CopyError> {
  let read_err = |source| CopyError::Read {
    path: src_dir.to_path_buf(),
    source,
  };

  let mut entries = fs::read_dir(src_dir)
    .map_err(read_err)?
    .collect::<Result<Vec<_>, _>>()
    .map_err(read_err)?;
  entries.sort_by_key(|e| e.file_name());

  let mut copied = Vec::new();
  for entry in entries {
    let from = entry.path();
    // fs::metadata follows symlinks; dangling links are skipped like directories
    let is_file = fs::metadata(&from).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
      trace!(path = ?from, "skipping non-file entry");
      continue;
    }

    let to = dest_dir.join(entry.file_name());
    fs::copy(&from, &to).map_err(|source| CopyError::Copy {
      from: from.clone(),
      to: to.clone(),
      source,
    })?;
    copied.push(to);
  }

  debug!(from = ?src_dir, to = ?dest_dir, count = copied.len(), "copied files");
  Ok(copied)
}

/// Recursively copy the tree rooted at `src` to `dest`.
///
/// `dest` must not exist yet. Symlinks are followed, so the copy holds the
/// linked content. Fails if `src` is missing or any entry is unreadable.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<u64, CopyError> {
  let mut files = 0u64;

  for entry in WalkDir::new(src).follow_links(true) {
    let entry = entry.map_err(|source| CopyError::Walk {
      path: src.to_path_buf(),
      source,
    })?;

    let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
    let target = dest.join(relative);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|source| CopyError::CreateDir {
        path: target.clone(),
        source,
      })?;
    } else {
      fs::copy(entry.path(), &target).map_err(|source| CopyError::Copy {
        from: entry.path().to_path_buf(),
        to: target.clone(),
        source,
      })?;
      files += 1;
    }
  }

  debug!(from = ?src, to = ?dest, files, "copied tree");
  Ok(files)
}
