//! Working-copy state checks

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShipResult;
use crate::core::vcs::SystemGit;

/// Check that HEAD is attached to a named branch
///
/// The pipeline has to return somewhere after the release branch is deleted;
/// a detached HEAD leaves it nowhere to go.
pub struct NamedBranchCheck;

impl Check for NamedBranchCheck {
  fn name(&self) -> &str {
    "named-branch"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> ShipResult<CheckResult> {
    let git = SystemGit::open(ctx.exec, &ctx.config.tools.git, ctx.work_tree)?;
    let branch = git.current_branch()?;

    if branch == "HEAD" {
      Ok(CheckResult::error(
        self.name(),
        "HEAD is detached",
        Some("Check out the branch you want to release from."),
      ))
    } else {
      Ok(CheckResult::pass(self.name(), format!("On branch '{}'", branch)))
    }
  }
}

/// Check that tracked files carry no uncommitted modifications
pub struct CleanWorkTreeCheck;

impl Check for CleanWorkTreeCheck {
  fn name(&self) -> &str {
    "clean-worktree"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> ShipResult<CheckResult> {
    let git = SystemGit::open(ctx.exec, &ctx.config.tools.git, ctx.work_tree)?;

    if git.has_uncommitted_changes()? {
      Ok(CheckResult::error(
        self.name(),
        "Uncommitted changes in tracked files",
        Some("Commit or stash your changes before releasing."),
      ))
    } else {
      Ok(CheckResult::pass(self.name(), "Working copy is clean"))
    }
  }
}
