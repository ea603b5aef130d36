//! Version-string substitution across the source tree
//!
//! Two opaque operations: ask git which tracked files contain the current
//! version, then rewrite them in place with sed. The pipeline only sees
//! pass/fail plus a file count for the log.

use crate::core::error::{ResultExt, ShipError, ShipResult};
use crate::core::exec::{CommandLine, Executor};
use crate::core::vcs::SystemGit;

/// Rewrite every occurrence of `current` to `target` in tracked files
///
/// Finding nothing to rewrite fails the stage: a tree that nowhere states
/// its own version cannot be version-bumped and released.
pub fn rewrite_versions(
  git: &SystemGit<'_>,
  exec: &dyn Executor,
  current: &str,
  target: &str,
) -> ShipResult<usize> {
  let files = git.grep_files(current)?;
  if files.is_empty() {
    return Err(ShipError::message(format!(
      "Current version '{}' appears nowhere in the tree; nothing to substitute",
      current
    )));
  }

  let script = format!("s/{}/{}/g", escape_sed_pattern(current), escape_sed_replacement(target));
  let cmd = CommandLine::new("sed")
    .arg("-i")
    .arg("-e")
    .arg(script)
    .args(files.iter().cloned())
    .current_dir(git.work_tree());

  exec.run(&cmd).context("In-place version rewrite failed")?;
  Ok(files.len())
}

/// Escape a literal string for use as a sed pattern
fn escape_sed_pattern(literal: &str) -> String {
  let mut escaped = String::with_capacity(literal.len());
  for c in literal.chars() {
    if matches!(c, '.' | '[' | ']' | '*' | '^' | '$' | '/' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}

/// Escape a literal string for use as a sed replacement
fn escape_sed_replacement(literal: &str) -> String {
  let mut escaped = String::with_capacity(literal.len());
  for c in literal.chars() {
    if matches!(c, '&' | '/' | '\\') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped
}
