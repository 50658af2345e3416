//! `cmake-ship release`
//!
//! Wires the real backends (cmake, git, gh) into the pipeline and prints the
//! outcome.

use crate::build::CMakeBuilder;
use crate::core::config::ProjectDescriptor;
use crate::core::error::ShipResult;
use crate::core::vcs::SystemGit;
use crate::core::version::VersionBump;
use crate::release::{GhCli, PipelineReport, PipelineRequest, ReleasePipeline, Toolchain};
use std::path::{Path, PathBuf};

/// Run the release pipeline for the project at `root`
pub fn run_release(
  root: &Path,
  config: Option<PathBuf>,
  bump: VersionBump,
  deploy: bool,
  json: bool,
) -> ShipResult<()> {
  let descriptor_path = ProjectDescriptor::resolve_path(root, config.as_deref());

  let builder = CMakeBuilder::new();
  let git = SystemGit::new(root);
  let host = GhCli;
  let tools = Toolchain {
    builder: &builder,
    scm: &git,
    host: &host,
  };

  let report = ReleasePipeline::new(root, &descriptor_path, PipelineRequest { bump, deploy }, tools).run()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }

  Ok(())
}

fn print_report(report: &PipelineReport) {
  println!();
  println!("📦 {} {} → {}", report.project, report.previous_version, report.version);
  println!();
  println!("  Archive: {}", report.package.path.display());
  println!("  SHA-256: {}", report.package.sha256);
  println!("  Entries: {}", report.package.entries.len());
  for entry in &report.package.entries {
    println!("    {}", entry);
  }

  if !report.missing_libraries.is_empty() || !report.package.missing_files.is_empty() {
    println!();
    for library in &report.missing_libraries {
      println!("⚠️  Library not found in build output: {}", library);
    }
    for file in &report.package.missing_files {
      println!("⚠️  Package file not found: {}", file);
    }
  }

  println!();
  match &report.tag {
    Some(tag) => println!("✅ Released {} ({})", report.version, tag),
    None if report.dry_run => {
      println!("🔍 Dry run complete (nothing committed, tagged or uploaded)");
      println!("   Re-run with --deploy to publish");
    }
    None => println!("✅ Built {}", report.version),
  }
}
