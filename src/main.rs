mod checks;
mod core;
mod pipeline;
mod prompt;
mod sbt;
mod ui;

use crate::core::config::ShipConfig;
use crate::core::error::{ShipError, ShipResult, print_error};
use crate::core::session::{ReleaseRequest, RemoteTarget};
use crate::prompt::TerminalConfirmer;
use crate::ui::Output;
use clap::Parser;

/// Drive a release: branch, bump, build, tag, publish
///
/// By default this is a dry run: every local stage executes for real, the
/// remote-mutating commands are only printed, and the working copy is
/// restored afterwards. Pass --real-run to actually publish.
#[derive(Parser)]
#[command(name = "shipway")]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Target release version (e.g. 1.4.0)
  #[arg(value_name = "VERSION")]
  version: String,

  /// Run the test suite before building
  #[arg(short = 't', long)]
  run_tests: bool,

  /// Override the publish host
  #[arg(short = 's', long, value_name = "ADDR")]
  server: Option<String>,

  /// Override the remote distribution path
  #[arg(short = 'p', long, value_name = "PATH")]
  path: Option<String>,

  /// Actually publish instead of dry-running
  #[arg(short = 'e', long)]
  real_run: bool,

  /// Skip the binary-compatibility report
  #[arg(short = 'm', long)]
  no_mima: bool,

  /// Keep the release branch and tag after a dry run
  #[arg(short = 'r', long)]
  no_revert: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> ShipResult<()> {
  let cwd = std::env::current_dir()?;
  let config = ShipConfig::load(&cwd)?;

  let version = semver::Version::parse(&cli.version)?;

  let remote = RemoteTarget {
    server: cli.server.unwrap_or_else(|| config.remote.server.clone()),
    path: cli.path.unwrap_or_else(|| config.remote.path.clone()),
  };

  let request = ReleaseRequest {
    version,
    remote,
    real_run: cli.real_run,
    run_tests: cli.run_tests,
    skip_compat_check: cli.no_mima,
    skip_revert_on_dry_run: cli.no_revert,
  };

  let out = Output::new(request.real_run);
  pipeline::run_release(&request, &config, &out, &TerminalConfirmer)
}

fn handle_error(err: ShipError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
