//! Publish-target connectivity probe

use crate::core::config::ToolsConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::exec::{CommandLine, Executor};
use crate::core::session::RemoteTarget;

/// No-op round trip to the publish host before any mutation begins
///
/// BatchMode keeps a missing key from degrading into a password prompt that
/// would hang a non-interactive run.
pub fn probe(exec: &dyn Executor, tools: &ToolsConfig, target: &RemoteTarget) -> ShipResult<()> {
  let cmd = CommandLine::new(&tools.remote_shell)
    .args(["-o", "BatchMode=yes"])
    .arg(&target.server)
    .arg("true");

  exec.run(&cmd).map_err(|e| ShipError::Connectivity {
    target: target.server.clone(),
    detail: e.to_string(),
  })?;

  Ok(())
}
