//! Preflight validation
//!
//! Before the pipeline touches anything it verifies the environment:
//!
//! - **required-tools**: every external executable is present
//! - **java-toolchain**: the required JDK major version is active
//! - **named-branch**: HEAD is attached to a branch it can return to
//! - **clean-worktree**: no uncommitted changes in tracked files
//!
//! All checks are pure probes. The one side effect of preflight comes after
//! they pass: untracked-file cleanup, which is destructive and therefore
//! gated on an interactive confirmation.

mod runner;
mod toolchain;
mod tools;
mod trait_def;
mod worktree;

pub use runner::create_default_runner;
pub use trait_def::{Check, CheckContext, CheckResult, Severity};

use crate::core::config::ShipConfig;
use crate::core::error::{PreflightError, ShipResult};
use crate::core::exec::Executor;
use crate::core::vcs::SystemGit;
use crate::prompt::Confirmer;
use crate::ui::Output;
use std::path::Path;

/// Run the full preflight: checks first, then the confirmed cleanup
///
/// Returns only when the working copy is validated and scrubbed; any
/// violation or a declined cleanup aborts before any state exists.
pub fn run_preflight(
  config: &ShipConfig,
  exec: &dyn Executor,
  work_tree: &Path,
  out: &Output,
  confirmer: &dyn Confirmer,
) -> ShipResult<()> {
  out.stage("preflight checks");

  let ctx = CheckContext {
    work_tree,
    config,
    exec,
  };

  let results = create_default_runner().run_all(&ctx, out);
  let failed = results
    .iter()
    .filter(|r| !r.passed && r.severity == Severity::Error)
    .count();
  if failed > 0 {
    return Err(PreflightError::ChecksFailed { failed }.into());
  }

  // Checks passed; now the destructive part. `git clean -fdx` also removes
  // ignored files (stale build output), so it always requires consent.
  let git = SystemGit::open(exec, &config.tools.git, work_tree)?;
  let untracked = git.untracked_files()?;
  if !untracked.is_empty() {
    out.note(&format!("{} untracked file(s) would be removed:", untracked.len()));
    for file in untracked.iter().take(10) {
      out.note(&format!("   {}", file));
    }
    if untracked.len() > 10 {
      out.note(&format!("   … and {} more", untracked.len() - 10));
    }
  }

  let confirmed = confirmer.confirm(
    "Remove all untracked and ignored files (git clean -fdx) to get a pristine tree?",
  )?;
  if !confirmed {
    return Err(PreflightError::CleanupDeclined.into());
  }

  git.clean_untracked()?;
  out.success("working copy is pristine");
  Ok(())
}
