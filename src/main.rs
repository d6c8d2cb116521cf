mod adapters;
mod commands;
mod core;
mod release;
mod ui;

use clap::Parser;
use core::config::CliFlags;
use core::error::{TagyError, print_error};
use release::Outcome;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Bump, tag and publish semantic-version releases from git
#[derive(Parser)]
#[command(name = "tagy")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  // ============================================================================
  // Increment (exactly one)
  // ============================================================================
  /// Release the next patch version (x.y.Z)
  #[arg(short, long, help_heading = "Increment")]
  patch: bool,

  /// Release the next minor version (x.Y.0)
  #[arg(short, long, help_heading = "Increment")]
  minor: bool,

  /// Release the next major version (X.0.0), asks for confirmation
  #[arg(long, help_heading = "Increment")]
  major: bool,

  /// Prompt for the version to release
  #[arg(long, help_heading = "Increment")]
  custom: bool,

  /// Delete the latest release tag locally and on origin
  #[arg(long, help_heading = "Increment")]
  reverse: bool,

  /// Show the latest release tag
  #[arg(long, help_heading = "Increment")]
  info: bool,

  // ============================================================================
  // Mode
  // ============================================================================
  /// Only update the manifest and files, never touch git
  #[arg(long)]
  soft: bool,

  /// Create the GitHub release without asking
  #[arg(long)]
  auto_release: bool,

  /// Prefix for release tags (overrides the manifest's tagPrefix)
  #[arg(long, value_name = "PREFIX")]
  tag_prefix: Option<String>,

  /// Diagnostic log filter (e.g. debug, tagy=trace)
  #[arg(long, env = "TAGY_LOG", default_value = "warn", value_name = "FILTER")]
  log_level: String,
}

impl Cli {
  fn flags(&self) -> CliFlags {
    CliFlags {
      patch: self.patch,
      minor: self.minor,
      major: self.major,
      custom: self.custom,
      reverse: self.reverse,
      info: self.info,
      soft: self.soft,
      auto_release: self.auto_release,
      tag_prefix: self.tag_prefix.clone(),
    }
  }
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
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(log_level: &str) {
  let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr),
    )
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(&cli.log_level);

  let raw_args: Vec<String> = std::env::args().skip(1).collect();

  match commands::run_release(&cli.flags(), &raw_args) {
    Ok(outcome) => {
      report(&outcome);
      std::process::exit(outcome.exit_code().as_i32());
    }
    Err(err) => handle_error(err),
  }
}

fn report(outcome: &Outcome) {
  match outcome {
    Outcome::Info { version, soft: true, .. } => println!("🏷️  Current version is: {}", version),
    Outcome::Info { tag: Some(tag), .. } => println!("🏷️  Last created tag is: {}", tag),
    Outcome::Info { tag: None, version, .. } => {
      println!("🏷️  Looks like no tags were created by this moment (current version {}).", version)
    }
    Outcome::NothingToReverse => println!("🏷️  Looks like no tags were created by this moment. Nothing to delete."),
    Outcome::Reversed { tag } => println!("🗑️  Tag {} --> deleted!", tag),
    Outcome::Released { tag, soft: false, .. } => println!("✅ Tag {} --> created!", tag),
    Outcome::Released { version, soft: true, .. } => println!("✅ Version {} --> updated!", version),
    Outcome::Aborted { reason } => {
      tracing::info!(reason = %reason, "run aborted");
      eprintln!("🚫 Aborted!");
    }
  }
}

fn handle_error(err: TagyError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
