//! Dry-run behavior: local stages run for real, remote commands only print

use crate::helpers::{TestWorkspace, exit_code, run_shipway, stderr, stdout};
use anyhow::Result;

#[test]
fn default_dry_run_restores_the_working_copy() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;

  assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));

  let out = stdout(&output);
  assert!(out.contains("would run:"), "stdout: {}", out);
  assert!(out.contains("push origin v1.0.0"), "stdout: {}", out);
  assert!(out.contains("--exclude=/downloads/"), "stdout: {}", out);
  assert!(out.contains("uploadArchives"), "stdout: {}", out);

  // The working copy is back where it started
  assert_eq!(ws.current_branch()?, "main");
  assert!(!ws.branch_exists("releasing-1.0.0")?);
  assert!(!ws.tag_exists("v1.0.0")?);
  assert!(ws.read_file("build.sbt")?.contains("version := \"0.1.0\""));

  // No remote mutation actually executed
  let log = ws.invocations();
  assert!(!log.contains("rsync"), "log: {}", log);
  assert!(!log.contains("uploadArchives"), "log: {}", log);
  Ok(())
}

#[test]
fn dry_run_builds_without_publish_options() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;
  assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));

  let log = ws.invocations();
  assert!(log.contains("sbt -batch clean"), "log: {}", log);
  assert!(log.contains("sbt -batch dist"), "log: {}", log);
  assert!(!log.contains("-Dpublish.central=true"), "log: {}", log);
  // Tests are off by default
  assert!(!log.contains("sbt -batch test"), "log: {}", log);
  Ok(())
}

#[test]
fn no_revert_keeps_branch_and_tag() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_shipway(&ws, &["1.0.0", "--no-revert"], "y")?;

  assert_eq!(exit_code(&output), 0, "stderr: {}", stderr(&output));
  assert!(ws.branch_exists("releasing-1.0.0")?);
  assert!(ws.tag_exists("v1.0.0")?);
  // The version bump is committed on the retained branch
  assert!(ws.read_file("build.sbt")?.contains("version := \"1.0.0\""));
  Ok(())
}

#[test]
fn compat_check_failure_is_advisory_only() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.fail_task("mimaReportBinaryIssues")?;

  let output = run_shipway(&ws, &["1.0.0"], "y")?;

  assert_eq!(exit_code(&output), 0, "advisory failure must not change the outcome");
  assert!(stderr(&output).contains("advisory"), "stderr: {}", stderr(&output));
  Ok(())
}

#[test]
fn no_mima_skips_the_compat_check() -> Result<()> {
  let ws = TestWorkspace::new()?;
  // Would fail the task if it ran
  ws.fail_task("mimaReportBinaryIssues")?;

  let output = run_shipway(&ws, &["1.0.0", "--no-mima"], "y")?;

  assert_eq!(exit_code(&output), 0);
  let log = ws.invocations();
  assert!(!log.contains("mimaReportBinaryIssues"), "log: {}", log);
  Ok(())
}
