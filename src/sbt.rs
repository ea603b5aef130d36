//! External build-tool client
//!
//! Every build-tool operation the pipeline needs, one method each, all going
//! through the `Executor` capability. The tool is configured in
//! `[build]` (defaults to sbt) and is treated as opaque: an invocation
//! either succeeds or fails, and nothing here interprets its output except
//! the version query, whose stdout the resolver parses.

use crate::core::config::BuildConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::{CommandLine, Executor};
use std::path::Path;

pub struct BuildTool<'a> {
  exec: &'a dyn Executor,
  cfg: &'a BuildConfig,
  work_tree: &'a Path,
}

impl<'a> BuildTool<'a> {
  pub fn new(exec: &'a dyn Executor, cfg: &'a BuildConfig, work_tree: &'a Path) -> Self {
    Self { exec, cfg, work_tree }
  }

  /// Raw stdout of the version task; parsing is the resolver's job
  pub fn query_version_raw(&self) -> ShipResult<String> {
    let cmd = self.task_cmd(&["-no-colors", "version"]);
    let output = self.exec.run(&cmd)?;
    Ok(output.stdout)
  }

  /// Remove all build state
  pub fn clean(&self) -> ShipResult<()> {
    self.run_task(&["clean"])
  }

  /// Run the full test suite
  pub fn test(&self) -> ShipResult<()> {
    self.run_task(&["test"])
  }

  /// Produce the release artifacts; real runs add the publish-to-central options
  pub fn build(&self, real_run: bool) -> ShipResult<()> {
    if real_run {
      let mut args: Vec<&str> = self.cfg.publish_options.iter().map(String::as_str).collect();
      args.push(self.cfg.build_task.as_str());
      self.run_task(&args)
    } else {
      self.run_task(&[self.cfg.build_task.as_str()])
    }
  }

  /// Advisory binary-compatibility report
  pub fn compat_check(&self) -> ShipResult<()> {
    self.run_task(&[self.cfg.compat_task.as_str()])
  }

  /// The command line that uploads artifacts to the artifact repository
  ///
  /// Returned unexecuted: a dry run prints it, a real run hands it to the
  /// executor, and both see the same text.
  pub fn upload_command(&self) -> CommandLine {
    self.task_cmd(&[self.cfg.upload_task.as_str()])
  }

  fn run_task(&self, args: &[&str]) -> ShipResult<()> {
    let cmd = self.task_cmd(args);
    self.exec.run(&cmd).map_err(ShipError::from)?;
    Ok(())
  }

  fn task_cmd(&self, args: &[&str]) -> CommandLine {
    CommandLine::new(&self.cfg.command)
      .arg("-batch")
      .args(args.iter().copied())
      .current_dir(self.work_tree)
  }
}
