//! Scoped subprocess launching.
//!
//! [`ProcessBuilder`] launches a child and hands back a [`ChildHandle`]; it
//! never waits on its own. Callers decide whether to [`ChildHandle::wait`],
//! [`ChildHandle::read`] the captured output, or [`ChildHandle::kill`].
//!
//! Standard input is inherited only when the host's stdin is usable. When no
//! explicit redirection is requested and the [`StdinProbe`] reports a detached
//! or non-standard descriptor, the child gets a fresh pipe instead.
//!
//! A handle that is dropped while its child is still running kills and reaps
//! the child.

mod stdin;

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::{debug, warn};

pub use stdin::{FixedStdin, HostStdin, StdinProbe, StdinState};

/// Errors from launching or supervising a child process.
#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("failed to launch {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to wait for {program}: {source}")]
  Wait {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to kill {program}: {source}")]
  Kill {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("child process for {program} was already reaped")]
  Reaped { program: String },
}

/// Builder for a child process.
#[derive(Debug)]
pub struct ProcessBuilder {
  program: OsString,
  args: Vec<OsString>,
  stdin: Option<Stdio>,
  text: bool,
}

impl ProcessBuilder {
  /// Start building a launch of `program`. Text mode is on by default.
  pub fn new(program: impl AsRef<OsStr>) -> Self {
    Self {
      program: program.as_ref().to_os_string(),
      args: Vec::new(),
      stdin: None,
      text: true,
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  /// Explicit stdin redirection. Skips the stdin capability query.
  pub fn stdin(mut self, stdin: Stdio) -> Self {
    self.stdin = Some(stdin);
    self
  }

  /// Decode captured output to text (`true`) or keep raw bytes (`false`).
  pub fn text(mut self, text: bool) -> Self {
    self.text = text;
    self
  }

  /// Launch against the real standard input of this process.
  pub fn spawn(self) -> Result<ChildHandle, ProcessError> {
    self.spawn_with(&HostStdin)
  }

  /// Launch, consulting `probe` to decide whether stdin can be inherited.
  pub fn spawn_with(self, probe: &dyn StdinProbe) -> Result<ChildHandle, ProcessError> {
    let program = self.program.to_string_lossy().into_owned();

    let stdin = match self.stdin {
      Some(stdin) => stdin,
      None => {
        let state = probe.probe();
        if state.is_inheritable() {
          Stdio::inherit()
        } else {
          debug!(program = %program, state = ?state, "stdin not inheritable, substituting a pipe");
          Stdio::piped()
        }
      }
    };

    let mut command = Command::new(&self.program);
    command
      .args(&self.args)
      .stdin(stdin)
      .stdout(Stdio::piped())
      .stderr(Stdio::piped());

    debug!(program = %program, args = ?self.args, "spawning process");

    let child = command.spawn().map_err(|source| ProcessError::Spawn {
      program: program.clone(),
      source,
    })?;

    Ok(ChildHandle {
      child: Some(child),
      program,
      text: self.text,
    })
  }
}

/// A live child process.
#[derive(Debug)]
pub struct ChildHandle {
  child: Option<Child>,
  program: String,
  text: bool,
}

impl ChildHandle {
  /// Block until the child exits.
  pub fn wait(&mut self) -> Result<ExitStatus, ProcessError> {
    let program = self.program.clone();
    let child = self.child_mut()?;
    child.wait().map_err(|source| ProcessError::Wait { program, source })
  }

  /// Block until the child exits and collect everything it wrote.
  pub fn read(mut self) -> Result<ProcessOutput, ProcessError> {
    let child = self.child.take().ok_or_else(|| ProcessError::Reaped {
      program: self.program.clone(),
    })?;
    let output = child.wait_with_output().map_err(|source| ProcessError::Wait {
      program: self.program.clone(),
      source,
    })?;

    Ok(ProcessOutput {
      status: output.status,
      stdout: Captured::new(output.stdout, self.text),
      stderr: Captured::new(output.stderr, self.text),
    })
  }

  /// Kill the child and reap it.
  pub fn kill(&mut self) -> Result<(), ProcessError> {
    let program = self.program.clone();
    let child = self.child_mut()?;
    child.kill().map_err(|source| ProcessError::Kill {
      program: program.clone(),
      source,
    })?;
    child.wait().map_err(|source| ProcessError::Wait { program, source })?;
    Ok(())
  }

  fn child_mut(&mut self) -> Result<&mut Child, ProcessError> {
    self.child.as_mut().ok_or_else(|| ProcessError::Reaped {
      program: self.program.clone(),
    })
  }
}

impl Drop for ChildHandle {
  fn drop(&mut self) {
    let Some(child) = self.child.as_mut() else {
      return;
    };
    if let Ok(None) = child.try_wait() {
      warn!(program = %self.program, pid = child.id(), "child still running at scope exit, killing");
      let _ = child.kill();
      let _ = child.wait();
    }
  }
}

/// Captured output of a finished child.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
  pub status: ExitStatus,
  pub stdout: Captured,
  pub stderr: Captured,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.status.success()
  }
}

/// One captured stream, decoded in text mode or raw otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
  Text(String),
  Bytes(Vec<u8>),
}

impl Captured {
  fn new(bytes: Vec<u8>, text: bool) -> Self {
    if text {
      Captured::Text(decode_text(&bytes))
    } else {
      Captured::Bytes(bytes)
    }
  }

  /// The stream as text; raw bytes are decoded lossily.
  pub fn as_text(&self) -> Cow<'_, str> {
    match self {
      Captured::Text(s) => Cow::Borrowed(s),
      Captured::Bytes(b) => String::from_utf8_lossy(b),
    }
  }
}

/// Lossy UTF-8 decode with universal newlines.
fn decode_text(bytes: &[u8]) -> String {
  String::from_utf8_lossy(bytes).replace("\r\n", "\n").replace('\r', "\n")
}
