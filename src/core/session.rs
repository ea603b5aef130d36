//! Release run state: request, session, tiers and stages
//!
//! `ReleaseRequest` is the immutable input built from CLI and config.
//! `ReleaseSession` is the single mutable run state; its tier field is the
//! one authoritative switch consulted by the failure handlers and by the
//! interrupt handler. The tier moves `Preflight -> Reversible` when the
//! machine starts and `Reversible -> Irreversible` exactly once, at the
//! point of no return, inside the same lock the interrupt handler takes.

use semver::Version;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// Failure-handling regime the session is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
  /// Before the pipeline starts; nothing has been created
  Preflight,
  /// Local mutations only; everything can be undone
  Reversible,
  /// A remote may have observed our state; nothing is undone automatically
  Irreversible,
}

/// Publish destination, resolved once from flags and config
#[derive(Debug, Clone)]
pub struct RemoteTarget {
  pub server: String,
  pub path: String,
}

/// Immutable description of the requested release
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
  pub version: Version,
  pub remote: RemoteTarget,
  pub real_run: bool,
  pub run_tests: bool,
  pub skip_compat_check: bool,
  pub skip_revert_on_dry_run: bool,
}

impl ReleaseRequest {
  pub fn release_branch(&self) -> String {
    format!("releasing-{}", self.version)
  }

  pub fn release_tag(&self) -> String {
    format!("v{}", self.version)
  }
}

/// Ordered units of work executed by the release machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Branch,
  Substitute,
  CleanBuild,
  Test,
  BuildArtifacts,
  CompatCheck,
  CommitTag,
  PushTag,
  SyncArtifacts,
  Upload,
}

impl Stage {
  /// Human-readable stage name used in logs and error reports
  pub fn describe(self) -> &'static str {
    match self {
      Stage::Branch => "create release branch",
      Stage::Substitute => "substitute version",
      Stage::CleanBuild => "clean build state",
      Stage::Test => "run test suite",
      Stage::BuildArtifacts => "build release artifacts",
      Stage::CompatCheck => "binary-compatibility check",
      Stage::CommitTag => "commit and tag",
      Stage::PushTag => "push tag",
      Stage::SyncArtifacts => "synchronize artifacts",
      Stage::Upload => "upload artifacts",
    }
  }

  /// Recovery regime a failure of this stage belongs to
  pub fn tier(self) -> Tier {
    match self {
      Stage::PushTag | Stage::SyncArtifacts | Stage::Upload => Tier::Irreversible,
      _ => Tier::Reversible,
    }
  }
}

/// Everything a recovery handler needs, independent of the live machine
///
/// The interrupt handler runs on its own thread and rebuilds its git access
/// from this context instead of borrowing the pipeline's.
#[derive(Debug, Clone)]
pub struct RecoveryContext {
  pub git_program: String,
  pub work_tree: PathBuf,
  pub initial_branch: String,
  pub release_branch: String,
  pub release_tag: String,
}

struct SessionState {
  tier: Tier,
  completed: Vec<&'static str>,
}

/// Shared session core, also held by the interrupt handler
pub struct SessionShared {
  state: Mutex<SessionState>,
  recovery: RecoveryContext,
}

impl SessionShared {
  fn lock(&self) -> MutexGuard<'_, SessionState> {
    // A poisoned lock means a panicking thread mid-update; the state is a
    // tier flag and a log, both valid at every point, so keep going.
    self.state.lock().unwrap_or_else(|p| p.into_inner())
  }

  pub fn tier(&self) -> Tier {
    self.lock().tier
  }

  pub fn recovery(&self) -> &RecoveryContext {
    &self.recovery
  }

  pub fn completed_stages(&self) -> Vec<&'static str> {
    self.lock().completed.clone()
  }

  /// Run `f` with the tier and stage log fixed for its whole duration
  ///
  /// The interrupt handler uses this so a concurrently-firing point-of-no-
  /// return transition cannot change the recovery policy under it.
  pub fn with_state<T>(&self, f: impl FnOnce(Tier, &[&'static str]) -> T) -> T {
    let guard = self.lock();
    f(guard.tier, &guard.completed)
  }
}

/// Mutable run state, owned by the release machine
pub struct ReleaseSession {
  shared: Arc<SessionShared>,
}

impl ReleaseSession {
  /// Construct the session; the tier starts at `Preflight`
  pub fn new(recovery: RecoveryContext) -> Self {
    Self {
      shared: Arc::new(SessionShared {
        state: Mutex::new(SessionState {
          tier: Tier::Preflight,
          completed: Vec::new(),
        }),
        recovery,
      }),
    }
  }

  /// Handle for the interrupt handler and failure reports
  pub fn shared(&self) -> Arc<SessionShared> {
    Arc::clone(&self.shared)
  }

  pub fn tier(&self) -> Tier {
    self.shared.tier()
  }

  pub fn recovery(&self) -> RecoveryContext {
    self.shared.recovery.clone()
  }

  pub fn completed_stages(&self) -> Vec<&'static str> {
    self.shared.completed_stages()
  }

  /// Record a successfully completed stage
  pub fn record(&self, stage: Stage) {
    self.shared.lock().completed.push(stage.describe());
  }

  /// Enter the reversible tier as the machine starts running
  pub fn arm(&self) {
    let mut state = self.shared.lock();
    if state.tier == Tier::Preflight {
      state.tier = Tier::Reversible;
    }
  }

  /// The point of no return: flip to `Irreversible`, once, atomically
  ///
  /// Interrupt routing consults the tier under this same lock, so a signal
  /// observes either the fully-reversible or the fully-irreversible state.
  pub fn cross_point_of_no_return(&self) {
    let mut state = self.shared.lock();
    debug_assert_ne!(state.tier, Tier::Preflight, "machine was never armed");
    state.tier = Tier::Irreversible;
  }
}
