//! The release state machine
//!
//! Executes the ordered stage sequence as one linear critical section:
//! preflight, connectivity, version resolution, branch, substitute, clean,
//! optional tests, build, advisory compat report, commit+tag, publish. Every
//! stage is guarded: a failure is dispatched to the recovery policy of the
//! tier the session is in at that moment, never to a policy chosen when the
//! stage was written. The tier flips exactly once, immediately after the
//! local commit and tag exist and before the first remote mutation.

pub mod connect;
pub mod escalate;
pub mod publish;
pub mod resolver;
pub mod rollback;
pub mod signal;
pub mod substitute;

use crate::checks;
use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::{Executor, SystemExecutor};
use crate::core::session::{RecoveryContext, ReleaseRequest, ReleaseSession, Stage, Tier};
use crate::core::vcs::SystemGit;
use crate::prompt::Confirmer;
use crate::sbt::BuildTool;
use crate::ui::Output;

/// Validate the environment, then drive the whole release
pub fn run_release(
  req: &ReleaseRequest,
  cfg: &ShipConfig,
  out: &Output,
  confirmer: &dyn Confirmer,
) -> ShipResult<()> {
  let exec = SystemExecutor;
  let cwd = std::env::current_dir()?;

  out.banner(&req.version.to_string(), &req.remote.server, &req.remote.path);

  // Preflight aborts plainly; nothing exists yet, so there is nothing to
  // recover and no interrupt handler to install.
  checks::run_preflight(cfg, &exec, &cwd, out, confirmer)?;

  let git = SystemGit::open(&exec, &cfg.tools.git, &cwd)?;
  let initial_branch = git.current_branch()?;

  let session = ReleaseSession::new(RecoveryContext {
    git_program: cfg.tools.git.clone(),
    work_tree: git.work_tree().to_path_buf(),
    initial_branch,
    release_branch: req.release_branch(),
    release_tag: req.release_tag(),
  });
  signal::install(session.shared(), req.real_run)?;

  let tool = BuildTool::new(&exec, &cfg.build, git.work_tree());
  let machine = ReleaseMachine {
    req,
    cfg,
    exec: &exec,
    git: &git,
    tool: &tool,
    out,
    session,
  };

  machine.run()
}

struct ReleaseMachine<'a> {
  req: &'a ReleaseRequest,
  cfg: &'a ShipConfig,
  exec: &'a dyn Executor,
  git: &'a SystemGit<'a>,
  tool: &'a BuildTool<'a>,
  out: &'a Output,
  session: ReleaseSession,
}

impl ReleaseMachine<'_> {
  fn run(&self) -> ShipResult<()> {
    let req = self.req;
    let target = req.version.to_string();
    let branch = req.release_branch();
    let tag = req.release_tag();

    self.session.arm();

    self.out.stage("remote connectivity");
    connect::probe(self.exec, &self.cfg.tools, &req.remote)
      .map_err(|e| self.fail("remote connectivity", e))?;
    self.out.success(&format!("publish target '{}' is reachable", req.remote.server));

    self.out.stage("resolve current version");
    let current = resolver::current_version(self.tool)
      .map_err(|e| self.fail("resolve current version", e))?;
    self.out.note(&format!("current version is {}, releasing {}", current, target));

    self.run_stage(Stage::Branch, || self.git.create_and_checkout_branch(&branch))?;

    let rewritten = self.run_stage(Stage::Substitute, || {
      substitute::rewrite_versions(self.git, self.exec, &current, &target)
    })?;
    self.out.note(&format!("rewrote {} file(s)", rewritten));

    self.run_stage(Stage::CleanBuild, || self.tool.clean())?;

    if req.run_tests {
      self.run_stage(Stage::Test, || self.tool.test())?;
    } else {
      self.out.note("skipping test suite (enable with --run-tests)");
    }

    self.run_stage(Stage::BuildArtifacts, || self.tool.build(req.real_run))?;

    // Advisory in dry runs only: reported, never fatal.
    if !req.real_run && !req.skip_compat_check {
      self.out.stage(Stage::CompatCheck.describe());
      match self.tool.compat_check() {
        Ok(()) => {
          self.session.record(Stage::CompatCheck);
          self.out.success("binary compatibility verified");
        }
        Err(err) => {
          self.out.warn(&format!("binary-compatibility check failed (advisory): {}", err));
        }
      }
    }

    let message = format!("Release {}", target);
    self.run_stage(Stage::CommitTag, || {
      self.git.commit_all(&message)?;
      self.git.tag_annotated(&tag, &message)
    })?;

    // The local commit and tag are cheap to undo; a half-observed remote
    // push is not. Flip here, before the first remote mutation.
    self.session.cross_point_of_no_return();
    self.out.note("passed the point of no return; failures from here require manual intervention");

    let cmds = publish::commands(self.git, self.tool, self.cfg, &req.remote, &tag);

    if req.real_run {
      self.run_stage(Stage::PushTag, || {
        self.out.running(&cmds.push_tag);
        self.exec.run(&cmds.push_tag)?;
        Ok(())
      })?;

      self.run_stage(Stage::SyncArtifacts, || {
        self.out.running(&cmds.sync_artifacts);
        self.exec.run(&cmds.sync_artifacts)?;
        Ok(())
      })?;

      self.run_stage(Stage::Upload, || {
        self.out.running(&cmds.upload);
        self.exec.run(&cmds.upload)?;
        Ok(())
      })?;

      let initial = self.session.recovery().initial_branch;
      self.out.note(&format!("returning to branch '{}'", initial));
      self
        .git
        .checkout_branch(&initial)
        .map_err(|e| self.fail("return to original branch", e))?;

      let stamp = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
      self.out.success(&format!(
        "released {} at {}; branch '{}' and tag '{}' retained",
        target, stamp, branch, tag
      ));
    } else {
      self.out.stage("publish (dry run)");
      self.out.would_run(&cmds.push_tag);
      self.out.would_run(&cmds.sync_artifacts);
      self.out.would_run(&cmds.upload);

      if req.skip_revert_on_dry_run {
        self.out.note(&format!("keeping branch '{}' and tag '{}' (--no-revert)", branch, tag));
      } else {
        // A dry run must leave the working copy as it found it, so the
        // recoverable handler's cleanup runs even though nothing failed.
        self.out.note("dry run complete; restoring the working copy");
        rollback::revert_local(self.exec, &self.session.recovery(), self.out)?;
      }

      self.out.success(&format!("dry run for {} finished", target));
    }

    Ok(())
  }

  /// Execute one stage, dispatching any failure to the active tier's policy
  fn run_stage<T>(&self, stage: Stage, f: impl FnOnce() -> ShipResult<T>) -> ShipResult<T> {
    // A remote-mutating stage must never run while the session would still
    // dispatch its failure to the reversible policy.
    debug_assert!(stage.tier() != Tier::Irreversible || self.session.tier() == Tier::Irreversible);

    self.out.stage(stage.describe());
    match f() {
      Ok(value) => {
        self.session.record(stage);
        Ok(value)
      }
      Err(err) => Err(self.fail(stage.describe(), err)),
    }
  }

  /// Recovery dispatch: the session's tier at failure time picks the policy
  fn fail(&self, stage: &'static str, err: ShipError) -> ShipError {
    match self.session.tier() {
      Tier::Irreversible => {
        escalate::report(
          self.out,
          &self.session.recovery(),
          &self.session.completed_stages(),
          &err.to_string(),
        );
        ShipError::Escalated {
          stage,
          source: Box::new(err),
        }
      }
      _ => {
        self.out.note("failure while still reversible; rolling back local changes");
        match rollback::revert_local(self.exec, &self.session.recovery(), self.out) {
          Ok(()) => ShipError::Reversible {
            stage,
            source: Box::new(err),
          },
          // A failed recovery outranks the failure that triggered it
          Err(secondary) => secondary,
        }
      }
    }
  }
}
