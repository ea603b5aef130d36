//! Active-JDK version check
//!
//! The build tool runs on whatever JDK is first on the path; releasing with
//! the wrong one produces artifacts with the wrong class-file version, so
//! the active major version must match the configured requirement exactly.

use super::trait_def::{Check, CheckContext, CheckResult};
use crate::core::error::ShipResult;
use crate::core::exec::CommandLine;

pub struct JavaToolchainCheck;

impl Check for JavaToolchainCheck {
  fn name(&self) -> &str {
    "java-toolchain"
  }

  fn run(&self, ctx: &CheckContext<'_>) -> ShipResult<CheckResult> {
    let required = ctx.config.build.required_java;
    let cmd = CommandLine::new(&ctx.config.tools.java).arg("-version");

    let output = match ctx.exec.run(&cmd) {
      Ok(out) => out,
      Err(e) => {
        return Ok(CheckResult::error(
          self.name(),
          format!("Cannot query the active JDK: {}", e),
          Some("Make sure `java -version` works in this shell."),
        ));
      }
    };

    // `java -version` reports on stderr
    let banner = if output.stderr.trim().is_empty() {
      output.stdout
    } else {
      output.stderr
    };

    match parse_java_major(&banner) {
      Some(major) if major == required => Ok(CheckResult::pass(
        self.name(),
        format!("Active JDK major version is {}", major),
      )),
      Some(major) => Ok(CheckResult::error(
        self.name(),
        format!("Active JDK is {}, but this release requires {}", major, required),
        Some(format!("Switch to a JDK {} before releasing.", required)),
      )),
      None => Ok(CheckResult::error(
        self.name(),
        format!("Could not parse JDK version from: {:?}", banner.lines().next().unwrap_or("")),
        None::<String>,
      )),
    }
  }
}

/// Extract the JDK major version from a `java -version` banner
///
/// Handles both modern (`openjdk version "17.0.2"`) and legacy
/// (`java version "1.8.0_292"`) version strings.
pub fn parse_java_major(banner: &str) -> Option<u32> {
  let line = banner.lines().find(|l| l.contains("version"))?;
  let quoted = line.split('"').nth(1)?;

  let mut parts = quoted.split(['.', '_', '-']);
  let first: u32 = parts.next()?.parse().ok()?;
  if first == 1 {
    // Legacy 1.x numbering: the major is the second component
    parts.next()?.parse().ok()
  } else {
    Some(first)
  }
}
