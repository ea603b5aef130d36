//! System git backend
//!
//! Uses git porcelain and plumbing commands through the `Executor`
//! capability. Safe configuration overrides are forced on every call so user
//! config cannot change behavior mid-release.

use crate::core::error::{GitError, ShipResult};
use crate::core::exec::{CommandLine, Executor};
use std::path::{Path, PathBuf};

/// Git backend driving the system git binary
pub struct SystemGit<'a> {
  exec: &'a dyn Executor,
  program: String,
  work_tree: PathBuf,
}

impl<'a> SystemGit<'a> {
  /// Open a git repository
  ///
  /// One subprocess call resolves the working-tree root; anything else is an
  /// immediate failure, there is no repo to release from.
  pub fn open(exec: &'a dyn Executor, program: impl Into<String>, path: &Path) -> ShipResult<Self> {
    let program = program.into();
    let probe = CommandLine::new(&program)
      .arg("-C")
      .arg(path.display().to_string())
      .args(["rev-parse", "--show-toplevel"]);

    let output = exec.run(&probe).map_err(|_| GitError::RepoNotFound {
      path: path.display().to_string(),
    })?;

    Ok(Self {
      exec,
      program,
      work_tree: PathBuf::from(output.stdout.trim()),
    })
  }

  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get current branch name; returns "HEAD" when detached
  pub fn current_branch(&self) -> ShipResult<String> {
    let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(output.trim().to_string())
  }

  /// Whether tracked files have uncommitted modifications
  pub fn has_uncommitted_changes(&self) -> ShipResult<bool> {
    let status = self.run(&["status", "--porcelain", "--untracked-files=no"])?;
    Ok(!status.trim().is_empty())
  }

  /// List untracked files (respecting ignore rules)
  pub fn untracked_files(&self) -> ShipResult<Vec<String>> {
    let output = self.run(&["ls-files", "--others", "--exclude-standard"])?;
    Ok(
      output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect(),
    )
  }

  /// Remove untracked files and directories, ignored files included
  pub fn clean_untracked(&self) -> ShipResult<()> {
    self.run(&["clean", "-fdx"])?;
    Ok(())
  }

  /// Discard all uncommitted changes to tracked files
  pub fn reset_hard(&self) -> ShipResult<()> {
    self.run(&["reset", "--hard", "HEAD"])?;
    Ok(())
  }

  /// List tracked files whose content contains the given fixed string
  ///
  /// `git grep` exits nonzero when nothing matches, which the executor cannot
  /// tell apart from a real failure; both surface here as an empty list, and
  /// the caller treats an empty list as its own error case.
  pub fn grep_files(&self, needle: &str) -> ShipResult<Vec<String>> {
    let output = self.run(&["grep", "-l", "--fixed-strings", "-e", needle, "--", "."]);
    match output {
      Ok(stdout) => Ok(
        stdout
          .lines()
          .map(str::trim)
          .filter(|l| !l.is_empty())
          .map(String::from)
          .collect(),
      ),
      Err(_) => Ok(Vec::new()),
    }
  }

  /// Create a branch off HEAD and switch to it
  pub fn create_and_checkout_branch(&self, branch: &str) -> ShipResult<()> {
    self.run(&["checkout", "-b", branch])?;
    Ok(())
  }

  /// Switch to an existing branch
  pub fn checkout_branch(&self, branch: &str) -> ShipResult<()> {
    self.run(&["checkout", branch])?;
    Ok(())
  }

  /// Delete a local branch regardless of merge state
  pub fn delete_branch(&self, branch: &str) -> ShipResult<()> {
    self.run(&["branch", "-D", branch])?;
    Ok(())
  }

  /// Whether a local branch exists
  pub fn branch_exists(&self, branch: &str) -> ShipResult<bool> {
    let output = self.run(&["branch", "--list", branch])?;
    Ok(!output.trim().is_empty())
  }

  /// Stage everything and commit
  pub fn commit_all(&self, message: &str) -> ShipResult<()> {
    self.run(&["add", "-A"])?;
    self.run(&["commit", "-m", message])?;
    Ok(())
  }

  /// Create an annotated tag
  pub fn tag_annotated(&self, tag: &str, message: &str) -> ShipResult<()> {
    self.run(&["tag", "-a", tag, "-m", message])?;
    Ok(())
  }

  /// Delete a local tag
  pub fn delete_tag(&self, tag: &str) -> ShipResult<()> {
    self.run(&["tag", "-d", tag])?;
    Ok(())
  }

  /// Whether a local tag exists
  pub fn tag_exists(&self, tag: &str) -> ShipResult<bool> {
    let output = self.run(&["tag", "--list", tag])?;
    Ok(!output.trim().is_empty())
  }

  /// The command line that pushes a tag to a remote
  ///
  /// Returned unexecuted: a dry run prints it, a real run hands it to the
  /// executor, and both see the same text.
  pub fn push_tag_command(&self, remote: &str, tag: &str) -> CommandLine {
    self.git_cmd().args(["push", remote, tag])
  }

  /// Run a git subcommand and return trimmed-as-is stdout
  fn run(&self, args: &[&str]) -> ShipResult<String> {
    let cmd = self.git_cmd().args(args.iter().copied());
    let output = self.exec.run(&cmd).map_err(|e| GitError::CommandFailed {
      command: cmd.to_string(),
      stderr: e.to_string(),
    })?;
    Ok(output.stdout)
  }

  /// Base git invocation with forced-safe configuration
  fn git_cmd(&self) -> CommandLine {
    CommandLine::new(&self.program)
      .arg("-C")
      .arg(self.work_tree.display().to_string())
      .args(["-c", "advice.detachedHead=false"])
      .args(["-c", "core.quotePath=false"])
  }
}
