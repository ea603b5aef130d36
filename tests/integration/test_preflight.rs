//! Preflight rejection: the process exits nonzero without mutating anything

use crate::helpers::{TestWorkspace, exit_code, run_shipway, stderr};
use anyhow::Result;

#[test]
fn dirty_worktree_is_rejected_without_mutation() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("build.sbt", "name := \"widget\"\n\nversion := \"0.1.0\" // edited\n")?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;

  assert_eq!(exit_code(&output), 2, "stderr: {}", stderr(&output));
  assert_eq!(ws.current_branch()?, "main");
  assert!(!ws.branch_exists("releasing-1.0.0")?);
  assert!(!ws.tag_exists("v1.0.0")?);
  // The dirty edit is untouched; preflight never cleans a rejected tree
  assert!(ws.read_file("build.sbt")?.contains("// edited"));
  Ok(())
}

#[test]
fn missing_build_tool_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file(
    "shipway.toml",
    "[build]\ncommand = \"/nonexistent/shipway-test-sbt\"\n",
  )?;
  crate::helpers::git(&ws.repo, &["commit", "-am", "break the build tool path"])?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;

  assert_eq!(exit_code(&output), 2);
  assert!(stderr(&output).contains("preflight"), "stderr: {}", stderr(&output));
  assert_eq!(ws.current_branch()?, "main");
  Ok(())
}

#[test]
fn declined_cleanup_aborts_before_any_mutation() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("scratch.txt", "untracked scratch file\n")?;

  let output = run_shipway(&ws, &["1.0.0"], "n")?;

  assert_eq!(exit_code(&output), 2);
  assert!(stderr(&output).contains("declined"), "stderr: {}", stderr(&output));
  assert!(!ws.branch_exists("releasing-1.0.0")?);
  // Declining means the untracked file survives
  assert!(ws.read_file("scratch.txt").is_ok());
  Ok(())
}

#[test]
fn invalid_version_is_a_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_shipway(&ws, &["not-a-version"], "y")?;

  assert_eq!(exit_code(&output), 1);
  assert!(stderr(&output).contains("version"), "stderr: {}", stderr(&output));
  Ok(())
}
