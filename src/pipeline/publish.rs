//! Publish-stage command construction
//!
//! The three remote-mutating commands are built once, identically for both
//! modes: a dry run prints them verbatim, a real run executes them. Keeping
//! construction in one place guarantees the printed text is the exact
//! command a real run would execute.

use crate::core::config::ShipConfig;
use crate::core::exec::CommandLine;
use crate::core::session::RemoteTarget;
use crate::core::vcs::SystemGit;
use crate::sbt::BuildTool;

/// The remote-mutating commands of the publish stage, in execution order
pub struct PublishCommands {
  pub push_tag: CommandLine,
  pub sync_artifacts: CommandLine,
  pub upload: CommandLine,
}

/// Build the publish commands for this release
pub fn commands(
  git: &SystemGit<'_>,
  tool: &BuildTool<'_>,
  cfg: &ShipConfig,
  target: &RemoteTarget,
  tag: &str,
) -> PublishCommands {
  // Trailing slashes make rsync copy directory contents, not the directory;
  // the leading slash anchors the exclude at the transfer root. Group-write
  // permissions let the server-side maintenance jobs touch what we upload.
  let sync_artifacts = CommandLine::new(&cfg.tools.remote_copy)
    .args(["-rtvp", "--chmod=Dg+ws,Fg+w"])
    .arg(format!("--exclude=/{}/", cfg.layout.downloads_dir))
    .arg(format!("{}/", cfg.layout.artifact_dir))
    .arg(format!("{}:{}/", target.server, target.path))
    .current_dir(git.work_tree());

  PublishCommands {
    push_tag: git.push_tag_command("origin", tag),
    sync_artifacts,
    upload: tool.upload_command(),
  }
}
