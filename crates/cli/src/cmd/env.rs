//! Implementation of the `pkgbind env` command.
//!
//! Loads an installed package's definition, evaluates its environment
//! commands for one variant and prints the result as a sourceable script.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use pkgbind_lib::activate::{Capabilities, activate, render_script};
use pkgbind_lib::bind::host_platform;
use pkgbind_lib::package::PackageDefinition;
use pkgbind_lib::shell::Shell;

use crate::output::print_warning;

pub fn cmd_env(package_dir: &Path, variant: Option<PathBuf>, shell: Option<Shell>, capabilities: &[String]) -> Result<()> {
  let definition = PackageDefinition::load(package_dir)
    .with_context(|| format!("Failed to load package at {}", package_dir.display()))?;

  let variant = match variant {
    Some(variant) => variant,
    None => host_platform()?.variant_subpath(),
  };
  let root = package_dir.join(&variant);
  if !root.is_dir() {
    bail!(
      "Variant {} of {} {} is not installed",
      variant.display(),
      definition.name,
      definition.version
    );
  }

  let mut caps = Capabilities::new();
  for assignment in capabilities {
    caps.assign(assignment)?;
  }

  let mutations = activate(&definition, &root, &caps).context("Failed to evaluate package commands")?;
  if mutations.is_empty() {
    print_warning("No environment changes for this package");
  }

  let shell = shell.unwrap_or_else(Shell::detect);
  debug!(shell = %shell, count = mutations.len(), "rendering activation script");
  print!("{}", render_script(&mutations, shell));

  Ok(())
}
