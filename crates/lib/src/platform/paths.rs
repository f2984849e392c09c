use std::env;
use std::path::PathBuf;

use crate::consts::{APP_NAME, PACKAGES_PATH_ENV, SEARCH_PATH_ENV};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  env::var("USERPROFILE").map(PathBuf::from).unwrap_or_default()
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  env::var("HOME").map(PathBuf::from).unwrap_or_default()
}

/// Returns the directory for data files for the application
#[cfg(windows)]
pub fn data_dir() -> PathBuf {
  let appdata = env::var("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"));
  appdata.join(APP_NAME)
}

/// Returns the directory for data files for the application
#[cfg(not(windows))]
pub fn data_dir() -> PathBuf {
  let data_home = env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

/// Default install path for bound packages.
///
/// `PKGBIND_PACKAGES_PATH` takes precedence over the data directory.
pub fn packages_dir() -> PathBuf {
  if let Ok(path) = env::var(PACKAGES_PATH_ENV)
    && !path.is_empty()
  {
    return PathBuf::from(path);
  }
  data_dir().join("packages")
}

/// Extra executable search directories from `PKGBIND_SEARCH_PATH`.
pub fn configured_search_dirs() -> Vec<PathBuf> {
  match env::var_os(SEARCH_PATH_ENV) {
    Some(value) => env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()).collect(),
    None => Vec::new(),
  }
}
