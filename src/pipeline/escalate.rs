//! Escalated-failure handler
//!
//! Past the point of no return another system may already have observed our
//! refs or artifacts, so automated rollback could corrupt shared state. This
//! handler changes nothing; it reports, unmissably, what exists and where,
//! and leaves the decision to a human.

use crate::core::session::RecoveryContext;
use crate::ui::Output;

/// Emit the manual-intervention report for a failure past the point of no return
pub fn report(out: &Output, ctx: &RecoveryContext, completed: &[&'static str], detail: &str) {
  let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

  out.alert("================================================================");
  out.alert("RELEASE FAILED AFTER THE POINT OF NO RETURN");
  out.alert("No automatic rollback will be attempted.");
  out.alert("================================================================");
  out.alert(&format!("time:           {}", now));
  out.alert(&format!("failure:        {}", detail));
  out.alert(&format!("release branch: {} (retained)", ctx.release_branch));
  out.alert(&format!("release tag:    {} (retained)", ctx.release_tag));
  out.alert(&format!("original branch: {}", ctx.initial_branch));
  if completed.is_empty() {
    out.alert("completed stages: none");
  } else {
    out.alert(&format!("completed stages: {}", completed.join(", ")));
  }
  out.alert("Remote refs, synchronized artifacts or uploads may already be");
  out.alert("visible to other systems. Inspect the state of the remote and");
  out.alert("the working copy, then resolve manually.");
  out.alert("================================================================");
}
