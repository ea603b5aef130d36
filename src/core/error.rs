//! Error types for shipway with contextual messages and exit codes
//!
//! This module provides a unified error type mirroring the failure taxonomy of
//! the release pipeline: preflight violations abort before anything exists,
//! reversible failures abort after local rollback has run, and escalated
//! failures abort loudly without touching anything further. Every error can
//! carry a help suggestion shown to the user.

use std::fmt;
use std::io;

/// Exit codes for shipway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (arguments, config)
  User = 1,
  /// Preflight violation (environment, toolchain, branch state)
  Preflight = 2,
  /// Reversible failure (local rollback has already run)
  Reversible = 3,
  /// Escalated failure, or a failed recovery (manual intervention required)
  Escalated = 4,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for shipway
#[derive(Debug)]
pub enum ShipError {
  /// Configuration errors (shipway.toml)
  Config(ConfigError),

  /// Preflight violations (nothing has been mutated yet)
  Preflight(PreflightError),

  /// Publish target unreachable before any mutation began
  Connectivity { target: String, detail: String },

  /// Current-version lookup via the build tool failed
  Resolver(ResolverError),

  /// Git operation errors
  Git(GitError),

  /// External command execution errors
  Exec(ExecError),

  /// A pipeline stage failed while the session was still reversible;
  /// local rollback has run by the time this propagates
  Reversible { stage: &'static str, source: Box<ShipError> },

  /// A failure at or past the point of no return; nothing was undone
  Escalated { stage: &'static str, source: Box<ShipError> },

  /// The recovery handler itself failed; state must be inspected by hand
  RecoveryFailed { during: &'static str, detail: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional help
  Message { message: String, help: Option<String> },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      help: Some(help.into()),
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Message { .. } => ExitCode::User,
      ShipError::Preflight(_) => ExitCode::Preflight,
      ShipError::Connectivity { .. } => ExitCode::Reversible,
      ShipError::Resolver(_) => ExitCode::Reversible,
      ShipError::Git(_) => ExitCode::Reversible,
      ShipError::Exec(_) => ExitCode::Reversible,
      ShipError::Reversible { .. } => ExitCode::Reversible,
      ShipError::Escalated { .. } => ExitCode::Escalated,
      ShipError::RecoveryFailed { .. } => ExitCode::Escalated,
      ShipError::Io(_) => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Preflight(e) => e.help_message(),
      ShipError::Connectivity { target, .. } => Some(format!(
        "Check ssh access to '{}' and that the host is online.",
        target
      )),
      ShipError::Resolver(_) => {
        Some("Run the build tool's version task by hand to see what it prints.".to_string())
      }
      ShipError::RecoveryFailed { .. } => {
        Some("Automatic rollback failed part-way. Please check the current state manually.".to_string())
      }
      ShipError::Escalated { .. } => {
        Some("Remote state may already be visible to others. Inspect and resolve manually.".to_string())
      }
      // The wrapper adds the stage; the underlying failure has the advice
      ShipError::Reversible { source, .. } => source.help_message(),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Preflight(e) => write!(f, "{}", e),
      ShipError::Connectivity { target, detail } => {
        write!(f, "Publish target '{}' is unreachable: {}", target, detail)
      }
      ShipError::Resolver(e) => write!(f, "{}", e),
      ShipError::Git(e) => write!(f, "{}", e),
      ShipError::Exec(e) => write!(f, "{}", e),
      ShipError::Reversible { stage, source } => {
        write!(f, "Stage '{}' failed: {}\nLocal changes have been rolled back.", stage, source)
      }
      ShipError::Escalated { stage, source } => {
        write!(f, "Stage '{}' failed past the point of no return: {}", stage, source)
      }
      ShipError::RecoveryFailed { during, detail } => {
        write!(f, "Recovery failed during '{}': {}", during, detail)
      }
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, .. } => write!(f, "{}", message),
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      ShipError::Reversible { source, .. } => Some(source.as_ref()),
      ShipError::Escalated { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<PreflightError> for ShipError {
  fn from(err: PreflightError) -> Self {
    ShipError::Preflight(err)
  }
}

impl From<ResolverError> for ShipError {
  fn from(err: ResolverError) -> Self {
    ShipError::Resolver(err)
  }
}

impl From<GitError> for ShipError {
  fn from(err: GitError) -> Self {
    ShipError::Git(err)
  }
}

impl From<ExecError> for ShipError {
  fn from(err: ExecError) -> Self {
    ShipError::Exec(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<toml_edit::de::Error> for ShipError {
  fn from(err: toml_edit::de::Error) -> Self {
    ShipError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<semver::Error> for ShipError {
  fn from(err: semver::Error) -> Self {
    ShipError::with_help(
      format!("Invalid release version: {}", err),
      "VERSION must be a semantic version such as 1.4.0 or 2.0.0-RC1.",
    )
  }
}

/// Convert anyhow::Error to ShipError (foreign-error interop)
impl From<anyhow::Error> for ShipError {
  fn from(err: anyhow::Error) -> Self {
    ShipError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// shipway.toml exists but could not be read
  Unreadable { path: String, detail: String },

  /// shipway.toml exists but does not parse
  Invalid { path: String, detail: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::Invalid { .. } => {
        Some("See the [remote], [build], [tools] and [layout] tables in the README for the expected shape.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::Unreadable { path, detail } => {
        write!(f, "Cannot read config file {}: {}", path, detail)
      }
      ConfigError::Invalid { path, detail } => {
        write!(f, "Invalid config file {}: {}", path, detail)
      }
    }
  }
}

/// Preflight violations; nothing has been created, so there is no rollback path
#[derive(Debug)]
pub enum PreflightError {
  /// One or more environment checks reported errors
  ChecksFailed { failed: usize },

  /// The operator declined the untracked-file cleanup
  CleanupDeclined,
}

impl PreflightError {
  fn help_message(&self) -> Option<String> {
    match self {
      PreflightError::ChecksFailed { .. } => {
        Some("Fix the reported issues and re-run.".to_string())
      }
      PreflightError::CleanupDeclined => None,
    }
  }
}

impl fmt::Display for PreflightError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PreflightError::ChecksFailed { failed } => {
        write!(f, "{} preflight check(s) failed", failed)
      }
      PreflightError::CleanupDeclined => {
        write!(f, "Untracked-file cleanup declined; aborting before any mutation")
      }
    }
  }
}

/// Current-version lookup failures
#[derive(Debug)]
pub enum ResolverError {
  /// The build tool could not be run or exited nonzero
  Tool { detail: String },

  /// The build tool ran but printed nothing usable
  Unparseable { output: String },
}

impl fmt::Display for ResolverError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResolverError::Tool { detail } => {
        write!(f, "Version lookup failed: {}", detail)
      }
      ResolverError::Unparseable { output } => {
        write!(f, "Version lookup produced no usable output: {:?}", output)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: String },
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path)
      }
    }
  }
}

/// External command execution errors
#[derive(Debug)]
pub enum ExecError {
  /// The program could not be started at all
  Spawn { program: String, detail: String },

  /// The program ran and exited nonzero
  Failed { command: String, stderr: String },
}

impl fmt::Display for ExecError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ExecError::Spawn { program, detail } => {
        write!(f, "Failed to start '{}': {}", program, detail)
      }
      ExecError::Failed { command, stderr } => {
        write!(f, "Command failed: {}\n{}", command, stderr.trim_end())
      }
    }
  }
}

/// Result type alias for shipway
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Replace the error with a plain message prefixed by context
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: fmt::Display,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| ShipError::message(format!("{}: {}", ctx.into(), e)))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
