//! Reversible-tier failures: full local rollback, exit code 3

use crate::helpers::{TestWorkspace, exit_code, run_shipway, stderr};
use anyhow::Result;

fn assert_rolled_back(ws: &TestWorkspace) -> Result<()> {
  assert_eq!(ws.current_branch()?, "main");
  assert!(!ws.branch_exists("releasing-1.0.0")?);
  assert!(!ws.tag_exists("v1.0.0")?);
  assert!(ws.read_file("build.sbt")?.contains("version := \"0.1.0\""));
  Ok(())
}

#[test]
fn build_failure_rolls_back_branch_and_substitution() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.fail_task("dist")?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;

  assert_eq!(exit_code(&output), 3, "stderr: {}", stderr(&output));
  assert!(stderr(&output).contains("rolled back"), "stderr: {}", stderr(&output));
  assert_rolled_back(&ws)
}

#[test]
fn failing_test_suite_aborts_the_release() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.fail_task("test")?;

  let output = run_shipway(&ws, &["1.0.0", "--run-tests"], "y")?;

  assert_eq!(exit_code(&output), 3, "stderr: {}", stderr(&output));
  // The build never ran; the suite failed first
  assert!(!ws.invocations().contains("sbt -batch dist"));
  assert_rolled_back(&ws)
}

#[test]
fn clean_failure_rolls_back() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.fail_task("clean")?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;

  assert_eq!(exit_code(&output), 3);
  assert_rolled_back(&ws)
}

#[test]
fn unreachable_target_aborts_before_any_branch_exists() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.fail_task("ssh")?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;

  assert_eq!(exit_code(&output), 3, "stderr: {}", stderr(&output));
  assert!(stderr(&output).contains("unreachable"), "stderr: {}", stderr(&output));
  // The rollback handler ran as a no-op; nothing had been created
  assert_rolled_back(&ws)?;
  assert!(!ws.invocations().contains("sbt -batch -no-colors version"));
  Ok(())
}

#[test]
fn rollback_leaves_no_trace_when_run_twice_in_a_row() -> Result<()> {
  // Two consecutive failing runs end in the same state: rollback is
  // idempotent and a rolled-back tree passes preflight again.
  let ws = TestWorkspace::new()?;
  ws.fail_task("dist")?;

  let first = run_shipway(&ws, &["1.0.0"], "y")?;
  assert_eq!(exit_code(&first), 3);
  assert_rolled_back(&ws)?;

  let second = run_shipway(&ws, &["1.0.0"], "y")?;
  assert_eq!(exit_code(&second), 3);
  assert_rolled_back(&ws)
}
