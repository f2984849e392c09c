//! Implementation of the `pkgbind bind` command.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use pkgbind_lib::bind::BindRequest;
use pkgbind_lib::bind::python::bind_python;
use pkgbind_lib::locate::SearchPath;
use pkgbind_lib::platform::paths;

use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

/// Arguments of `pkgbind bind python`.
pub struct BindArgs {
  pub exe: Option<PathBuf>,
  pub range: Option<String>,
  pub install_path: Option<PathBuf>,
  pub search_paths: Vec<PathBuf>,
  pub force: bool,
  pub output: OutputFormat,
}

/// Bind the host's Python into the install path.
///
/// Extra search directories come from `PKGBIND_SEARCH_PATH` first, then from
/// `--search-path` flags.
pub fn cmd_bind_python(args: BindArgs) -> Result<()> {
  let install_path = args.install_path.unwrap_or_else(paths::packages_dir);

  let mut request = BindRequest::new(&install_path).with_force(args.force);
  if let Some(range) = args.range {
    request = request.with_range(range);
  }
  if let Some(exe) = args.exe {
    request = request.with_exe(exe);
  }

  let mut search = SearchPath::new(paths::configured_search_dirs());
  let search = search.extend(&args.search_paths);
  info!(install_path = %install_path.display(), extra_dirs = search.dirs().len(), "starting bind");

  let start = Instant::now();
  let installed = bind_python(&request, &search).context("Bind failed")?;
  let elapsed = start.elapsed();

  if args.output.is_json() {
    print_json(&installed)?;
  } else {
    print_success(&format!(
      "Bound {} {} in {}",
      installed.name,
      installed.version,
      format_duration(elapsed)
    ));
    print_stat("Variant", &installed.variant.to_string());
    print_stat("Package", &installed.version_dir.display().to_string());
    print_stat("Root", &installed.root.display().to_string());
    println!();
    print_info(&format!(
      "Activate with: pkgbind env {}",
      installed.version_dir.display()
    ));
  }

  Ok(())
}
