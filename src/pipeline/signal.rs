//! Tier-aware interrupt routing
//!
//! One handler is installed for the whole run; which recovery policy it
//! applies is decided at delivery time from the session's tier, read under
//! the same lock the point-of-no-return transition takes. The handler holds
//! that lock for its entire recovery, so the transition and an interrupt can
//! never interleave.

use crate::core::error::{ExitCode, ShipResult, print_error};
use crate::core::exec::SystemExecutor;
use crate::core::session::{SessionShared, Tier};
use crate::pipeline::{escalate, rollback};
use crate::ui::Output;
use std::sync::Arc;

/// Install the interrupt handler for this release session
pub fn install(shared: Arc<SessionShared>, real_run: bool) -> ShipResult<()> {
  ctrlc::set_handler(move || {
    let out = Output::new(real_run);

    shared.with_state(|tier, completed| match tier {
      Tier::Preflight => {
        out.warn("interrupted; nothing has been mutated");
        std::process::exit(ExitCode::User.as_i32());
      }
      Tier::Reversible => {
        out.warn("interrupted; rolling back local changes");
        match rollback::revert_local(&SystemExecutor, shared.recovery(), &out) {
          Ok(()) => {
            out.note("working copy restored");
            std::process::exit(ExitCode::Reversible.as_i32());
          }
          Err(err) => {
            print_error(&err);
            std::process::exit(ExitCode::Escalated.as_i32());
          }
        }
      }
      Tier::Irreversible => {
        escalate::report(
          &out,
          shared.recovery(),
          completed,
          "interrupted past the point of no return",
        );
        std::process::exit(ExitCode::Escalated.as_i32());
      }
    })
  })
  .map_err(|e| format!("Failed to install interrupt handler: {}", e).into())
}
