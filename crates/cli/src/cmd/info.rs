use anyhow::Result;

use pkgbind_lib::bind::host_platform;
use pkgbind_lib::platform::paths::{configured_search_dirs, packages_dir};

use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_info(output: OutputFormat) -> Result<()> {
  let platform = host_platform()?;
  let packages = packages_dir();
  let search_dirs = configured_search_dirs();

  if output.is_json() {
    print_json(&serde_json::json!({
      "version": env!("CARGO_PKG_VERSION"),
      "platform": platform.triple(),
      "variant": platform.requirements(),
      "packages_path": packages,
      "search_path": search_dirs,
    }))?;
    return Ok(());
  }

  print_info(&format!("pkgbind v{}", env!("CARGO_PKG_VERSION")));
  print_stat("Platform", &platform.triple());
  print_stat("Variant", &platform.variant_subpath().display().to_string());
  print_stat("Packages", &packages.display().to_string());
  if !search_dirs.is_empty() {
    let joined: Vec<String> = search_dirs.iter().map(|d| d.display().to_string()).collect();
    print_stat("Search path", &joined.join(", "));
  }

  Ok(())
}
