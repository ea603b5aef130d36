//! Interrupt routing: the tier at signal time picks the recovery policy

use crate::helpers::{
  TestWorkspace, exit_code, git, interrupt, spawn_shipway, stderr, wait_for_invocation,
};
use anyhow::Result;

#[test]
fn interrupt_while_reversible_rolls_back() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.slow_task("dist")?;

  let child = spawn_shipway(&ws, &["1.0.0"])?;
  // The build stage runs after branch, substitution and commit-free edits;
  // once the stub stalls there the session is deep in the reversible tier.
  wait_for_invocation(&ws, "sbt -batch dist")?;
  interrupt(&child)?;

  let output = child.wait_with_output()?;
  assert_eq!(exit_code(&output), 3, "stderr: {}", stderr(&output));
  assert!(stderr(&output).contains("interrupted"), "stderr: {}", stderr(&output));

  assert_eq!(ws.current_branch()?, "main");
  assert!(!ws.branch_exists("releasing-1.0.0")?);
  assert!(!ws.tag_exists("v1.0.0")?);
  assert!(ws.read_file("build.sbt")?.contains("version := \"0.1.0\""));
  Ok(())
}

#[test]
fn interrupt_past_the_point_of_no_return_is_escalated() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let bare = ws.add_origin()?;
  ws.slow_task("rsync")?;

  let child = spawn_shipway(&ws, &["1.0.0", "--real-run"])?;
  // The artifact sync only starts after the commit, tag and push: by the
  // time the stub stalls the session is irreversible.
  wait_for_invocation(&ws, "rsync ")?;
  interrupt(&child)?;

  let output = child.wait_with_output()?;
  assert_eq!(exit_code(&output), 4, "stderr: {}", stderr(&output));
  assert!(
    stderr(&output).contains("POINT OF NO RETURN"),
    "stderr: {}",
    stderr(&output)
  );

  // Nothing was undone: local branch and tag remain, the push stands
  assert!(ws.branch_exists("releasing-1.0.0")?);
  assert!(ws.tag_exists("v1.0.0")?);
  let pushed = git(&bare, &["tag", "--list", "v1.0.0"])?;
  assert!(!String::from_utf8_lossy(&pushed.stdout).trim().is_empty());
  Ok(())
}
