//! Injectable confirmation capability
//!
//! The one interactive moment in the pipeline (destructive cleanup of
//! untracked files) goes through the `Confirmer` trait so tests can stub it
//! and non-terminal runs can answer through stdin.

use crate::core::error::{ResultExt, ShipError, ShipResult};
use std::io::{BufRead, IsTerminal};

pub trait Confirmer {
  /// Ask the operator a yes/no question; only an affirmative answer returns true
  fn confirm(&self, prompt: &str) -> ShipResult<bool>;
}

/// Confirmer for real runs: dialoguer on a TTY, one stdin line otherwise
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
  fn confirm(&self, prompt: &str) -> ShipResult<bool> {
    let stdin = std::io::stdin();

    if stdin.is_terminal() {
      return dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| ShipError::message(format!("Confirmation prompt failed: {}", e)));
    }

    // Piped stdin: the prompt still appears on stderr, the answer is one line
    eprintln!("{} [y/N]", prompt);
    let mut line = String::new();
    stdin
      .lock()
      .read_line(&mut line)
      .context("Failed to read confirmation answer")?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
  }
}
