mod build;
mod commands;
mod core;
mod header;
mod release;
mod ui;
mod utils;

use clap::{ArgGroup, Parser, Subcommand};
use crate::core::error::{ShipError, ShipResult, print_error};
use crate::core::version::VersionBump;
use std::path::PathBuf;
use tracing::Level;

/// Version, header and release tooling for CMake projects
#[derive(Parser)]
#[command(name = "cmake-ship")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Run as if started in DIR
  #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
  directory: Option<PathBuf>,

  /// Log debug detail to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Emit logs as JSON lines
  #[arg(long, global = true)]
  log_json: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the composite version (MAJOR.MINOR.PATCH+BUILD.COMMIT[-dirty])
  Version {
    /// Output every field as JSON
    #[arg(long)]
    json: bool,
  },

  /// Regenerate the version header and print its include directory
  Header {
    /// Header path (default: <buildDir>/generated/version.h)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
  },

  /// Bump, rebuild, verify and package; publish with --deploy
  #[command(group(ArgGroup::new("bump").args(["major", "minor", "patch"])))]
  Release {
    /// Bump MAJOR, reset MINOR, PATCH and the build counter
    #[arg(long)]
    major: bool,
    /// Bump MINOR, reset PATCH and the build counter
    #[arg(long)]
    minor: bool,
    /// Bump PATCH and increment the build counter
    #[arg(long)]
    patch: bool,
    /// Commit, tag and upload (default: dry run)
    #[arg(long)]
    deploy: bool,
    /// Project descriptor path (default: release.json)
    #[arg(long, value_name = "PATH", env = "CMAKE_SHIP_CONFIG")]
    config: Option<PathBuf>,
    /// Output the release report as JSON
    #[arg(long)]
    json: bool,
  },

  /// Create the bootstrap files for a CMake project
  Init {
    /// Project name (default: the CMake project() name or directory name)
    #[arg(long)]
    name: Option<String>,
    /// Release repository as owner/repo
    #[arg(long, value_name = "OWNER/REPO")]
    repo: Option<String>,
  },
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

fn main() {
  let cli = Cli::parse();

  let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
  crate::core::telemetry::init_tracing(cli.log_json, level);

  if let Err(err) = run(cli) {
    handle_error(err);
  }
}

fn run(cli: Cli) -> ShipResult<()> {
  let cwd = std::env::current_dir()?;
  let root = match cli.directory {
    Some(dir) if dir.is_absolute() => dir,
    Some(dir) => cwd.join(dir),
    None => cwd,
  };

  match cli.command {
    Commands::Version { json } => commands::run_version(&root, json),
    Commands::Header { output } => commands::run_header(&root, output),
    Commands::Release {
      major,
      minor,
      patch,
      deploy,
      config,
      json,
    } => {
      let bump = VersionBump::from_flags(major, minor, patch)
        .ok_or_else(|| ShipError::with_help("Conflicting bump flags", "Pass at most one of --major, --minor, --patch"))?;
      commands::run_release(&root, config, bump, deploy, json)
    }
    Commands::Init { name, repo } => commands::run_init(&root, name, repo),
  }
}

fn handle_error(err: ShipError) -> ! {
  tracing::error!(exit_code = err.exit_code().as_i32(), "command failed");
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
