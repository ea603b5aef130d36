//! Opaque external-command capability
//!
//! Every foreign tool the pipeline drives (git, the build tool, rsync, ssh,
//! sed) is invoked through the `Executor` trait: hand it a `CommandLine`, get
//! back captured output or a typed failure. A nonzero exit status surfaces as
//! `ExecError::Failed` here, so no caller ever inspects status codes.

use crate::core::error::ExecError;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// A fully-described invocation of an external program
#[derive(Debug, Clone)]
pub struct CommandLine {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory; inherits the process cwd when None
  pub cwd: Option<PathBuf>,
}

impl CommandLine {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }
}

impl fmt::Display for CommandLine {
  /// Render roughly as a shell would read it, for "would run:" output
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.contains(char::is_whitespace) || arg.is_empty() {
        write!(f, " '{}'", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Captured output of a successful invocation
#[derive(Debug)]
pub struct ExecOutput {
  pub stdout: String,
  pub stderr: String,
}

/// Capability for running external commands
///
/// Implementations decide how the command actually runs; callers only see
/// success with output, or a typed failure.
pub trait Executor {
  fn run(&self, cmd: &CommandLine) -> Result<ExecOutput, ExecError>;
}

/// Executor backed by `std::process::Command`
///
/// Blocks until the child exits and captures both streams. Stdin is not
/// connected; tools that would prompt fail instead of hanging.
pub struct SystemExecutor;

impl Executor for SystemExecutor {
  fn run(&self, cmd: &CommandLine) -> Result<ExecOutput, ExecError> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);
    command.stdin(std::process::Stdio::null());
    if let Some(dir) = &cmd.cwd {
      command.current_dir(dir);
    }

    let output = command.output().map_err(|e| ExecError::Spawn {
      program: cmd.program.clone(),
      detail: e.to_string(),
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
      return Err(ExecError::Failed {
        command: cmd.to_string(),
        stderr: if stderr.trim().is_empty() { stdout } else { stderr },
      });
    }

    Ok(ExecOutput { stdout, stderr })
  }
}
