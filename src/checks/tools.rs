//! Required-executable checks

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShipResult;

/// Check that every external tool the pipeline drives is on the search path
pub struct RequiredToolsCheck;

impl Check for RequiredToolsCheck {
  fn name(&self) -> &str {
    "required-tools"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> ShipResult<CheckResult> {
    let tools = &ctx.config.tools;
    let required = [
      tools.git.as_str(),
      tools.java.as_str(),
      tools.remote_copy.as_str(),
      tools.remote_shell.as_str(),
      ctx.config.build.command.as_str(),
      "sed",
    ];

    let missing: Vec<&str> = required
      .iter()
      .copied()
      .filter(|tool| which::which(tool).is_err())
      .collect();

    if missing.is_empty() {
      Ok(CheckResult::pass(
        self.name(),
        format!("All {} required tools found", required.len()),
      ))
    } else {
      Ok(CheckResult::error(
        self.name(),
        format!("Missing executables: {}", missing.join(", ")),
        Some("Install the missing tools or point [tools] in shipway.toml at them."),
      ))
    }
  }
}
