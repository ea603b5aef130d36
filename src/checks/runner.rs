//! Check execution and reporting

use super::toolchain::JavaToolchainCheck;
use super::tools::RequiredToolsCheck;
use super::trait_def::{Check, CheckContext, CheckResult};
use super::worktree::{CleanWorkTreeCheck, NamedBranchCheck};
use crate::ui::Output;

/// Runs a fixed set of checks in registration order
pub struct CheckRunner {
  checks: Vec<Box<dyn Check>>,
}

impl CheckRunner {
  /// Run every check, rendering each result as it arrives
  ///
  /// A check that errors out internally (e.g. git missing entirely) is
  /// reported as a failed check rather than aborting the report.
  pub fn run_all(&self, ctx: &CheckContext<'_>, out: &Output) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(self.checks.len());

    for check in &self.checks {
      let result = match check.run(ctx) {
        Ok(result) => result,
        Err(err) => CheckResult::error(check.name(), err.to_string(), None::<String>),
      };

      if result.passed {
        out.note(&format!("✅ {}: {}", result.check_name, result.message));
      } else {
        out.warn(&format!("{} {}: {}", result.severity, result.check_name, result.message));
        if let Some(suggestion) = &result.suggestion {
          out.note(&format!("   ↳ {}", suggestion));
        }
      }

      results.push(result);
    }

    results
  }
}

/// The preflight set: tools, toolchain, branch state, worktree state
pub fn create_default_runner() -> CheckRunner {
  CheckRunner {
    checks: vec![
      Box::new(RequiredToolsCheck),
      Box::new(JavaToolchainCheck),
      Box::new(NamedBranchCheck),
      Box::new(CleanWorkTreeCheck),
    ],
  }
}
