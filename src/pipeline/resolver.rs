//! Currently-configured version lookup
//!
//! Asks the build tool for its version setting and digs the value out of the
//! log-formatted, possibly color-coded output: strip terminal escapes, take
//! the last non-empty line, take its last token.

use crate::core::error::{ResolverError, ShipError, ShipResult};
use crate::sbt::BuildTool;
use regex::Regex;
use std::sync::OnceLock;

/// Query the build tool for the version the tree is currently at
pub fn current_version(tool: &BuildTool<'_>) -> ShipResult<String> {
  let raw = tool.query_version_raw().map_err(|e| {
    ShipError::Resolver(ResolverError::Tool {
      detail: e.to_string(),
    })
  })?;

  parse_version_output(&raw).ok_or_else(|| {
    ShipError::Resolver(ResolverError::Unparseable {
      output: raw.chars().take(200).collect(),
    })
  })
}

fn ansi_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("escape-sequence pattern is valid")
  })
}

/// Remove terminal control sequences from tool output
pub fn strip_ansi(input: &str) -> String {
  ansi_pattern().replace_all(input, "").into_owned()
}

/// Extract the version from the tool's stdout
///
/// The version task typically ends with a line like `[info] 1.4.0`; the
/// interesting value is the last token of the last non-empty line.
pub fn parse_version_output(stdout: &str) -> Option<String> {
  let cleaned = strip_ansi(stdout);
  let line = cleaned.lines().rev().find(|l| !l.trim().is_empty())?;
  let version = line.split_whitespace().last()?;
  if version.is_empty() {
    None
  } else {
    Some(version.to_string())
  }
}
