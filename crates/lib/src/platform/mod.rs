pub mod arch;
pub mod os;
pub mod paths;

use std::fmt;
use std::path::PathBuf;

pub use arch::Arch;
pub use os::Os;
use serde::{Deserialize, Serialize};

/// Platform identifier combining architecture and OS (e.g., "x86_64-linux").
///
/// A bound package has exactly one variant: the platform it was bound on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the platform triple string (e.g., "aarch64-darwin")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }

  /// Variant requirements in package-definition form.
  pub fn requirements(&self) -> Vec<String> {
    vec![format!("platform-{}", self.os), format!("arch-{}", self.arch)]
  }

  /// Directory of this variant relative to the package version directory.
  pub fn variant_subpath(&self) -> PathBuf {
    self.requirements().iter().collect()
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn platform_triple_format() {
    let platform = Platform::new(Arch::Aarch64, Os::MacOs);
    assert_eq!(platform.triple(), "aarch64-darwin");

    let platform = Platform::new(Arch::X86_64, Os::Linux);
    assert_eq!(platform.triple(), "x86_64-linux");
  }

  #[test]
  fn variant_subpath_nests_platform_then_arch() {
    let platform = Platform::new(Arch::X86_64, Os::Windows);
    assert_eq!(platform.requirements(), vec!["platform-windows", "arch-x86_64"]);
    assert_eq!(
      platform.variant_subpath(),
      PathBuf::from("platform-windows").join("arch-x86_64")
    );
  }
}
