//! Recoverable-failure handler
//!
//! Undoes every local mutation the pipeline may have made: uncommitted
//! edits, untracked files, the release branch and the release tag. Each step
//! checks whether its target exists first, which makes the whole handler
//! idempotent and a safe no-op when nothing has been mutated yet.
//!
//! No further failure is tolerated here: any git error mid-revert leaves
//! state that only a human should touch, and surfaces as `RecoveryFailed`.

use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::Executor;
use crate::core::session::RecoveryContext;
use crate::core::vcs::SystemGit;
use crate::ui::Output;

/// Revert all local repository mutations described by the recovery context
pub fn revert_local(exec: &dyn Executor, ctx: &RecoveryContext, out: &Output) -> ShipResult<()> {
  let git = SystemGit::open(exec, &ctx.git_program, &ctx.work_tree)
    .map_err(|e| failed("open repository", e))?;

  out.note("discarding uncommitted changes");
  git.reset_hard().map_err(|e| failed("discard uncommitted changes", e))?;

  out.note("removing untracked files");
  git.clean_untracked().map_err(|e| failed("remove untracked files", e))?;

  let on_release_branch = git
    .current_branch()
    .map_err(|e| failed("query current branch", e))?
    == ctx.release_branch;

  if on_release_branch {
    out.note(&format!("switching back to '{}'", ctx.initial_branch));
    git
      .checkout_branch(&ctx.initial_branch)
      .map_err(|e| failed("switch back to original branch", e))?;
  }

  if git
    .branch_exists(&ctx.release_branch)
    .map_err(|e| failed("probe release branch", e))?
  {
    out.note(&format!("deleting branch '{}'", ctx.release_branch));
    git
      .delete_branch(&ctx.release_branch)
      .map_err(|e| failed("delete release branch", e))?;
  }

  if git
    .tag_exists(&ctx.release_tag)
    .map_err(|e| failed("probe release tag", e))?
  {
    out.note(&format!("deleting tag '{}'", ctx.release_tag));
    git
      .delete_tag(&ctx.release_tag)
      .map_err(|e| failed("delete release tag", e))?;
  }

  Ok(())
}

fn failed(during: &'static str, err: ShipError) -> ShipError {
  ShipError::RecoveryFailed {
    during,
    detail: err.to_string(),
  }
}
