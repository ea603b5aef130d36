//! Check trait abstraction for preflight validation
//!
//! Every environment precondition is a `Check`: a named, self-describing
//! probe producing a `CheckResult`. The runner executes the registered set
//! and the pipeline refuses to start while any check reports an error.

use crate::core::config::ShipConfig;
use crate::core::error::ShipResult;
use crate::core::exec::Executor;
use std::fmt;
use std::path::Path;

/// Severity level for check results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  /// Informational (not an issue)
  Info,
  /// Non-blocking, but should be addressed
  Warning,
  /// Blocking; the release must not start
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Info => write!(f, "INFO"),
      Severity::Warning => write!(f, "WARN"),
      Severity::Error => write!(f, "ERROR"),
    }
  }
}

/// Result of running a check
#[derive(Debug, Clone)]
pub struct CheckResult {
  pub check_name: String,
  pub passed: bool,
  pub severity: Severity,
  pub message: String,
  pub suggestion: Option<String>,
}

impl CheckResult {
  /// Create a passing check result
  pub fn pass(check_name: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      check_name: check_name.into(),
      passed: true,
      severity: Severity::Info,
      message: message.into(),
      suggestion: None,
    }
  }

  /// Create a failing check result with error severity
  pub fn error(
    check_name: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      passed: false,
      severity: Severity::Error,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
    }
  }

  /// Create a failing check result with warning severity
  #[allow(dead_code)]
  pub fn warning(
    check_name: impl Into<String>,
    message: impl Into<String>,
    suggestion: Option<impl Into<String>>,
  ) -> Self {
    Self {
      check_name: check_name.into(),
      passed: false,
      severity: Severity::Warning,
      message: message.into(),
      suggestion: suggestion.map(|s| s.into()),
    }
  }
}

/// Context passed to checks
pub struct CheckContext<'a> {
  /// Working-copy root
  pub work_tree: &'a Path,
  /// Loaded configuration (tool names, required toolchain)
  pub config: &'a ShipConfig,
  /// Command capability for probes that must run something
  pub exec: &'a dyn Executor,
}

/// A single preflight validation
pub trait Check {
  /// Short identifier shown in the report
  fn name(&self) -> &str;

  /// Run the validation
  fn run(&self, ctx: &CheckContext<'_>) -> ShipResult<CheckResult>;
}
