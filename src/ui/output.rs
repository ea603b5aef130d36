//! Tag-prefixed console reporting
//!
//! Every pipeline message carries the `[shipway]` tag. Dry-run mode announces
//! skipped remote mutations as `would run:` lines; real-run mode prints the
//! command it is about to execute. Styling via anstyle, matching the CLI help.

use crate::core::exec::CommandLine;
use anstyle::{AnsiColor, Style};

const TAG: &str = "[shipway]";

fn bold() -> Style {
  Style::new().bold()
}

fn dim() -> Style {
  Style::new().dimmed()
}

fn warn_style() -> Style {
  Style::new().bold().fg_color(Some(AnsiColor::Yellow.into()))
}

fn alert_style() -> Style {
  Style::new().bold().fg_color(Some(AnsiColor::Red.into()))
}

/// Console reporter; one per run
pub struct Output {
  real_run: bool,
}

impl Output {
  pub fn new(real_run: bool) -> Self {
    Self { real_run }
  }

  /// Opening banner naming the mode and target version
  pub fn banner(&self, version: &str, server: &str, path: &str) {
    let style = bold();
    let mode = if self.real_run { "real run" } else { "dry run" };
    println!("{style}🚀 {} releasing {} ({}){style:#}", TAG, version, mode);
    println!("{} publish target: {}:{}", TAG, server, path);
  }

  /// Announce a stage transition
  pub fn stage(&self, name: &str) {
    let style = bold();
    println!("{style}{} ▸ {}{style:#}", TAG, name);
  }

  /// A command being executed right now
  pub fn running(&self, cmd: &CommandLine) {
    let style = dim();
    println!("{} running: {style}{}{style:#}", TAG, cmd);
  }

  /// A remote-mutating command suppressed by dry-run mode
  pub fn would_run(&self, cmd: &CommandLine) {
    println!("{} would run: {}", TAG, cmd);
  }

  /// Plain progress note
  pub fn note(&self, msg: &str) {
    println!("{} {}", TAG, msg);
  }

  pub fn success(&self, msg: &str) {
    println!("{} ✅ {}", TAG, msg);
  }

  /// Problem report; does not itself terminate anything
  pub fn warn(&self, msg: &str) {
    let style = warn_style();
    eprintln!("{style}{} ⚠️  {}{style:#}", TAG, msg);
  }

  /// Part of the unmissable escalation report
  pub fn alert(&self, msg: &str) {
    let style = alert_style();
    eprintln!("{style}{} {}{style:#}", TAG, msg);
  }
}
