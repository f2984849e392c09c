//! Standard-input capability query.
//!
//! Some embedding hosts close or replace the process's standard input. Passing
//! such a handle to a child fails at spawn time, so the launcher asks a
//! [`StdinProbe`] what it is about to inherit before deciding.

/// What the current process's standard input looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinState {
  /// A valid low-level descriptor.
  Descriptor(i32),
  /// No usable descriptor (closed, or replaced by something without one).
  Detached,
}

impl StdinState {
  /// Whether a child may inherit this stdin as-is.
  ///
  /// Only descriptors in the three standard slots {0, 1, 2} are inherited.
  pub fn is_inheritable(&self) -> bool {
    matches!(self, StdinState::Descriptor(fd) if (0..=2).contains(fd))
  }
}

/// Reports the state of the standard input a child would inherit.
pub trait StdinProbe {
  fn probe(&self) -> StdinState;
}

/// Probe for the real standard input of this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostStdin;

#[cfg(unix)]
impl StdinProbe for HostStdin {
  fn probe(&self) -> StdinState {
    use std::os::fd::{AsFd, AsRawFd};

    let stdin = std::io::stdin();
    let fd = stdin.as_fd();
    match rustix::io::fcntl_getfd(fd) {
      Ok(_) => StdinState::Descriptor(fd.as_raw_fd()),
      Err(_) => StdinState::Detached,
    }
  }
}

#[cfg(windows)]
impl StdinProbe for HostStdin {
  fn probe(&self) -> StdinState {
    use std::os::windows::io::AsRawHandle;

    let handle = std::io::stdin().as_raw_handle();
    if handle.is_null() || handle as isize == -1 {
      StdinState::Detached
    } else {
      StdinState::Descriptor(0)
    }
  }
}

/// A stand-in stdin with a fixed state, for hosts that substitute their own.
#[derive(Debug, Clone, Copy)]
pub struct FixedStdin(pub StdinState);

impl StdinProbe for FixedStdin {
  fn probe(&self) -> StdinState {
    self.0
  }
}
