//! Explicit executable search path.
//!
//! Lookups search the process `PATH` followed by the directories held in a
//! [`SearchPath`]. Nothing here touches process-global state: a temporary
//! augmentation is a [`SearchPathGuard`] that puts the original list back when
//! it drops, on every exit path.
//!
//! Guards are neither `Send` nor `Sync`. A search path is meant to be owned by
//! one thread for the length of a bind.

use std::env;
use std::ffi::OsString;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
  dirs: Vec<PathBuf>,
}

impl SearchPath {
  pub fn new(dirs: Vec<PathBuf>) -> Self {
    Self { dirs }
  }

  /// Extra directories, in lookup order.
  pub fn dirs(&self) -> &[PathBuf] {
    &self.dirs
  }

  /// Add `paths` for the lifetime of the returned guard.
  pub fn extend<I, P>(&mut self, paths: I) -> SearchPathGuard<'_>
  where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
  {
    let original = self.dirs.clone();
    self.dirs.extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
    SearchPathGuard {
      search: self,
      original: Some(original),
      _not_send: PhantomData,
    }
  }

  /// The full lookup list: `PATH` entries, then the extra directories.
  ///
  /// Returns `None` when there is nothing to search.
  pub fn lookup_list(&self) -> Option<OsString> {
    let mut all: Vec<PathBuf> = env::var_os("PATH")
      .map(|p| env::split_paths(&p).collect())
      .unwrap_or_default();
    all.extend(self.dirs.iter().cloned());
    all.retain(|p| !p.as_os_str().is_empty());

    if all.is_empty() {
      return None;
    }
    env::join_paths(all).ok()
  }
}

/// Scoped extension of a [`SearchPath`].
pub struct SearchPathGuard<'a> {
  search: &'a mut SearchPath,
  original: Option<Vec<PathBuf>>,
  _not_send: PhantomData<*const ()>,
}

impl Deref for SearchPathGuard<'_> {
  type Target = SearchPath;

  fn deref(&self) -> &SearchPath {
    self.search
  }
}

impl DerefMut for SearchPathGuard<'_> {
  fn deref_mut(&mut self) -> &mut SearchPath {
    self.search
  }
}

impl Drop for SearchPathGuard<'_> {
  fn drop(&mut self) {
    if let Some(original) = self.original.take() {
      self.search.dirs = original;
    }
  }
}
