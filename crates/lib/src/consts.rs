pub const APP_NAME: &str = "pkgbind";

/// File name of the package definition inside a package version directory.
pub const PACKAGE_DEFINITION: &str = "package.json";

/// Overrides the default install path for bound packages.
pub const PACKAGES_PATH_ENV: &str = "PKGBIND_PACKAGES_PATH";

/// Extra directories searched for executables, in platform path-list syntax.
pub const SEARCH_PATH_ENV: &str = "PKGBIND_SEARCH_PATH";
