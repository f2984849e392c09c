//! Python binding.
//!
//! Produces a `python` package whose variant root holds a flat copy of the
//! interpreter's directory in `bin/` and, when any were found, copies of its
//! builtin module directories in `python/<category>/`.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::{BindError, BindRequest, InstalledVariant, host_platform};
use crate::introspect::{BuiltinModulePaths, Introspector, ModuleManifest};
use crate::locate::{SearchPath, locate_executable};
use crate::package::{EnvCommand, NoopToggle, PackageError, PackageRecord};
use crate::platform::Platform;
use crate::util::fs::{copy_files_flat, copy_tree};
use crate::version::{VersionRange, check_version, extract_version};

pub const PACKAGE_NAME: &str = "python";

/// Executable names tried in order.
pub const EXECUTABLE_NAMES: &[&str] = &["python", "python3"];

/// Prints `major.minor.micro`.
pub const VERSION_PROBE: &str = "import sys; print('.'.join(str(x) for x in sys.version_info[:3]))";

/// `(category, module)` pairs whose directories are copied into the package.
pub const BUILTIN_MODULES: &[(&str, &str)] = &[("lib", "os"), ("extra", "setuptools")];

/// Capability that turns the package's environment commands off.
pub const NOOP_CAPABILITY: &str = "dcc_python";

fn noop_toggle() -> NoopToggle {
  NoopToggle {
    name: NOOP_CAPABILITY.to_string(),
    default: "0".to_string(),
    value: "1".to_string(),
  }
}

/// Prepend the package's `bin` to `PATH`.
pub fn commands() -> Vec<EnvCommand> {
  vec![EnvCommand::PrependPath {
    var: "PATH".to_string(),
    path: "{root}/bin".to_string(),
    unless: Some(noop_toggle()),
  }]
}

/// Append each builtin module directory to `PYTHONPATH`.
pub fn post_commands() -> Vec<EnvCommand> {
  vec![EnvCommand::AppendSubdirs {
    var: "PYTHONPATH".to_string(),
    dir: "{root}/python".to_string(),
    unless: Some(noop_toggle()),
  }]
}

/// Bind the host's Python for the current platform.
pub fn bind_python(request: &BindRequest, search: &SearchPath) -> Result<InstalledVariant, BindError> {
  bind_python_on(request, search, host_platform()?)
}

/// Bind Python, recording `platform` as the package variant.
pub fn bind_python_on(
  request: &BindRequest,
  search: &SearchPath,
  platform: Platform,
) -> Result<InstalledVariant, BindError> {
  let range = request.range.as_deref().map(VersionRange::parse).transpose()?;

  let exe = locate_executable(EXECUTABLE_NAMES, request.exe.as_deref(), search)?;
  info!(exe = %exe.path.display(), "binding python");

  let version = extract_version(&exe.path, VERSION_PROBE)?;
  check_version(&version, range.as_ref())?;

  let manifest = ModuleManifest::python();
  let module_paths = Introspector::new(&exe, &version, platform.os)
    .with_manifest(&manifest)
    .discover(BUILTIN_MODULES);

  let record = PackageRecord {
    name: PACKAGE_NAME.to_string(),
    version: version.to_string(),
    tools: vec![PACKAGE_NAME.to_string()],
    commands: commands(),
    post_commands: (!module_paths.is_empty()).then(post_commands),
    variant: platform,
  };

  let installed = request
    .maker()
    .make(&record, |root| materialize(root, &exe.base_dir, &module_paths))?;

  info!(
    version = %installed.version,
    root = %installed.variant_root.display(),
    "python bound"
  );

  Ok(InstalledVariant {
    name: installed.name,
    version: installed.version,
    variant: installed.variant,
    version_dir: installed.version_dir,
    root: installed.variant_root,
  })
}

/// Write the payload into the variant root.
///
/// Only regular files from `base_dir` go into `bin/`. Each module directory is
/// copied whole into `python/<category>/`, and `python/` exists only if there
/// is at least one.
pub fn materialize(root: &Path, base_dir: &Path, module_paths: &BuiltinModulePaths) -> Result<(), PackageError> {
  let bin = root.join("bin");
  fs::create_dir_all(&bin).map_err(|source| PackageError::CreateDir {
    path: bin.clone(),
    source,
  })?;
  let copied = copy_files_flat(base_dir, &bin)?;
  debug!(count = copied.len(), "copied interpreter files");

  if module_paths.is_empty() {
    return Ok(());
  }

  let python_dir = root.join("python");
  fs::create_dir_all(&python_dir).map_err(|source| PackageError::CreateDir {
    path: python_dir.clone(),
    source,
  })?;

  for (category, src) in module_paths.iter() {
    let files = copy_tree(src, &python_dir.join(category))?;
    debug!(category, src = %src.display(), files, "copied builtin modules");
  }

  Ok(())
}
