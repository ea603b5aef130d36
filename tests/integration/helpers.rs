//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// A test workspace: a git repository to release from, plus a bin directory
/// of stub external tools wired in through shipway.toml
///
/// The bin directory lives outside the repository so preflight's
/// `git clean -fdx` cannot touch the stubs.
pub struct TestWorkspace {
  _root: TempDir,
  pub repo: PathBuf,
  pub bin: PathBuf,
}

impl TestWorkspace {
  /// Create a repository at version 0.1.0 with stub sbt/java/rsync/ssh tools
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let repo = root.path().join("repo");
    let bin = root.path().join("bin");
    std::fs::create_dir_all(&repo)?;
    std::fs::create_dir_all(&bin)?;

    // Stub tools log every invocation into bin/invocations.log, fail when a
    // fail-<arg> marker exists beside them, and stall when a slow-<arg>
    // marker exists (so tests can deliver a signal mid-stage).
    write_stub(
      &bin,
      "sbt",
      r#"#!/bin/sh
dir="$(cd "$(dirname "$0")" && pwd)"
echo "sbt $*" >> "$dir/invocations.log"
for arg in "$@"; do
  if [ -e "$dir/fail-$arg" ]; then
    echo "stub sbt: induced failure for $arg" >&2
    exit 1
  fi
  if [ -e "$dir/slow-$arg" ]; then
    sleep 10
  fi
done
case "$*" in
  *version*) printf '[info] 0.1.0\n' ;;
esac
exit 0
"#,
    )?;

    write_stub(
      &bin,
      "java",
      r#"#!/bin/sh
echo 'openjdk version "17.0.2" 2022-01-18' >&2
exit 0
"#,
    )?;

    write_stub(
      &bin,
      "rsync",
      r#"#!/bin/sh
dir="$(cd "$(dirname "$0")" && pwd)"
echo "rsync $*" >> "$dir/invocations.log"
if [ -e "$dir/fail-rsync" ]; then
  echo "stub rsync: induced failure" >&2
  exit 1
fi
if [ -e "$dir/slow-rsync" ]; then
  sleep 10
fi
exit 0
"#,
    )?;

    write_stub(
      &bin,
      "ssh",
      r#"#!/bin/sh
dir="$(cd "$(dirname "$0")" && pwd)"
echo "ssh $*" >> "$dir/invocations.log"
if [ -e "$dir/fail-ssh" ]; then
  echo "stub ssh: induced failure" >&2
  exit 1
fi
exit 0
"#,
    )?;

    // Repository with the current version stated in two tracked files
    git(&repo, &["init", "--initial-branch=main"])?;
    git(&repo, &["config", "user.name", "Test User"])?;
    git(&repo, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      repo.join("build.sbt"),
      "name := \"widget\"\n\nversion := \"0.1.0\"\n",
    )?;
    std::fs::write(
      repo.join("README.md"),
      "# widget\n\nCurrent release: 0.1.0\n",
    )?;
    std::fs::write(
      repo.join("shipway.toml"),
      format!(
        r#"[remote]
server = "test@releases.invalid"
path = "/srv/releases"

[build]
command = "{bin}/sbt"

[tools]
java = "{bin}/java"
remote_copy = "{bin}/rsync"
remote_shell = "{bin}/ssh"
"#,
        bin = bin.display()
      ),
    )?;

    git(&repo, &["add", "."])?;
    git(&repo, &["commit", "-m", "Initial project setup"])?;

    Ok(Self { _root: root, repo, bin })
  }

  /// Make the next stub invocation carrying this argument fail
  pub fn fail_task(&self, arg: &str) -> Result<()> {
    std::fs::write(self.bin.join(format!("fail-{}", arg)), "")?;
    Ok(())
  }

  /// Make the next stub invocation carrying this argument stall for long
  /// enough to deliver a signal into the stage
  pub fn slow_task(&self, arg: &str) -> Result<()> {
    std::fs::write(self.bin.join(format!("slow-{}", arg)), "")?;
    Ok(())
  }

  /// Create a bare remote and register it as origin
  pub fn add_origin(&self) -> Result<PathBuf> {
    let bare = self._root.path().join("origin.git");
    git(self._root.path(), &["init", "--bare", bare.to_str().context("utf8 path")?])?;
    git(&self.repo, &["remote", "add", "origin", bare.to_str().context("utf8 path")?])?;
    Ok(bare)
  }

  pub fn current_branch(&self) -> Result<String> {
    let output = git(&self.repo, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn branch_exists(&self, branch: &str) -> Result<bool> {
    let output = git(&self.repo, &["branch", "--list", branch])?;
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
  }

  pub fn tag_exists(&self, tag: &str) -> Result<bool> {
    let output = git(&self.repo, &["tag", "--list", tag])?;
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.repo.join(path))?)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    std::fs::write(self.repo.join(path), content)?;
    Ok(())
  }

  /// Everything the stub tools were invoked with, in order
  pub fn invocations(&self) -> String {
    std::fs::read_to_string(self.bin.join("invocations.log")).unwrap_or_default()
  }
}

fn write_stub(bin: &Path, name: &str, body: &str) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let path = bin.join(name);
  std::fs::write(&path, body)?;
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
  Ok(())
}

/// Run git in a directory, failing the test on a nonzero exit
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the shipway binary with the given arguments and stdin answer
///
/// The answer feeds the untracked-cleanup confirmation; "y" accepts it.
pub fn run_shipway(ws: &TestWorkspace, args: &[&str], answer: &str) -> Result<Output> {
  let shipway_bin = env!("CARGO_BIN_EXE_shipway");

  let mut child = Command::new(shipway_bin)
    .current_dir(&ws.repo)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to start shipway")?;

  // A run that aborts before the confirmation never reads stdin; ignore the
  // resulting broken pipe.
  let mut stdin = child.stdin.take().context("stdin not captured")?;
  let _ = stdin.write_all(format!("{}\n", answer).as_bytes());
  drop(stdin);

  Ok(child.wait_with_output()?)
}

/// Start the shipway binary without waiting for it, answering the cleanup
/// confirmation up front; used by the signal tests
pub fn spawn_shipway(ws: &TestWorkspace, args: &[&str]) -> Result<std::process::Child> {
  let shipway_bin = env!("CARGO_BIN_EXE_shipway");

  let mut child = Command::new(shipway_bin)
    .current_dir(&ws.repo)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .context("Failed to start shipway")?;

  let mut stdin = child.stdin.take().context("stdin not captured")?;
  let _ = stdin.write_all(b"y\n");
  drop(stdin);

  Ok(child)
}

/// Block until the stub invocation log contains the needle, or give up
pub fn wait_for_invocation(ws: &TestWorkspace, needle: &str) -> Result<()> {
  for _ in 0..200 {
    if ws.invocations().contains(needle) {
      return Ok(());
    }
    std::thread::sleep(std::time::Duration::from_millis(50));
  }
  anyhow::bail!("stub invocation '{}' never appeared; log: {}", needle, ws.invocations());
}

/// Deliver SIGINT to a running shipway process
pub fn interrupt(child: &std::process::Child) -> Result<()> {
  let status = Command::new("kill")
    .args(["-INT", &child.id().to_string()])
    .status()
    .context("Failed to run kill")?;
  anyhow::ensure!(status.success(), "kill -INT failed");
  Ok(())
}

/// Exit code of a finished run, or -1 when killed by a signal
pub fn exit_code(output: &Output) -> i32 {
  output.status.code().unwrap_or(-1)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
