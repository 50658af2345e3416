//! Release archive assembly
//!
//! Executables and libraries land at the archive root; package files and
//! directories keep their project-relative paths.

use crate::build::ArtifactSet;
use crate::core::config::ProjectDescriptor;
use crate::core::error::{ShipResult, ResultExt};
use crate::ui::progress::FileProgress;
use crate::utils::path_to_git_format;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::FileOptions;

/// Archive extension used for every platform
pub const ARCHIVE_EXT: &str = "zip";

/// `{projectName}-{platformTag}-{MAJOR.MINOR.PATCH}.{ext}`
pub fn archive_name(project_name: &str, platform: &str, triple: &str) -> String {
  format!("{}-{}-{}.{}", project_name, platform, triple, ARCHIVE_EXT)
}

/// One file scheduled for the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
  /// Forward-slash name inside the archive
  pub name: String,
  pub source: PathBuf,
  pub executable: bool,
}

/// Ordered archive contents plus what was skipped
#[derive(Debug, Clone, Default)]
pub struct PackagePlan {
  pub entries: Vec<PackageEntry>,
  pub missing_files: Vec<String>,
}

impl PackagePlan {
  /// Collect archive contents from verified artifacts and the descriptor's package files
  pub fn collect(root: &Path, descriptor: &ProjectDescriptor, artifacts: &ArtifactSet) -> ShipResult<Self> {
    let mut plan = PackagePlan::default();
    let mut seen = BTreeSet::new();

    for path in &artifacts.executables {
      plan.push_flat(path, true, &mut seen);
    }
    for path in &artifacts.libraries {
      plan.push_flat(path, false, &mut seen);
    }

    for item in &descriptor.package_files {
      let source = root.join(item);
      if source.is_file() {
        let name = entry_name(root, &source);
        plan.push(name, source, false, &mut seen);
      } else if source.is_dir() {
        for entry in WalkDir::new(&source).sort_by_file_name() {
          let entry = entry?;
          if entry.file_type().is_file() {
            let name = entry_name(root, entry.path());
            plan.push(name, entry.path().to_path_buf(), false, &mut seen);
          }
        }
      } else {
        warn!(file = %item, "package file not found, skipping");
        plan.missing_files.push(item.clone());
      }
    }

    Ok(plan)
  }

  fn push_flat(&mut self, path: &Path, executable: bool, seen: &mut BTreeSet<String>) {
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default();
    self.push(name, path.to_path_buf(), executable, seen);
  }

  fn push(&mut self, name: String, source: PathBuf, executable: bool, seen: &mut BTreeSet<String>) {
    if name.is_empty() {
      return;
    }
    if !seen.insert(name.clone()) {
      warn!(entry = %name, "duplicate archive entry, keeping the first");
      return;
    }
    self.entries.push(PackageEntry {
      name,
      source,
      executable,
    });
  }
}

/// Archive-relative name: project-relative path, or the bare file name for
/// anything outside the project root
fn entry_name(root: &Path, path: &Path) -> String {
  match path.strip_prefix(root) {
    Ok(relative) => path_to_git_format(relative),
    Err(_) => path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default(),
  }
}

/// Result of writing the archive
#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
  pub path: PathBuf,
  pub entries: Vec<String>,
  pub missing_files: Vec<String>,
  pub sha256: String,
}

/// Write `plan` to `archive`, replacing any existing file of that name
pub fn write_package(archive: &Path, plan: &PackagePlan) -> ShipResult<PackageSummary> {
  if archive.exists() {
    debug!(path = %archive.display(), "removing previous archive");
    fs::remove_file(archive).with_context(|| format!("Failed to remove {}", archive.display()))?;
  }
  if let Some(parent) = archive.parent() {
    fs::create_dir_all(parent)?;
  }

  let file = File::create(archive).with_context(|| format!("Failed to create {}", archive.display()))?;
  let mut writer = zip::ZipWriter::new(file);
  let base = FileOptions::default().compression_method(CompressionMethod::Deflated);

  let mut progress = FileProgress::maybe(plan.entries.len(), "Packaging");
  for entry in &plan.entries {
    let options = if entry.executable {
      base.unix_permissions(0o755)
    } else {
      base.unix_permissions(0o644)
    };
    writer.start_file(entry.name.as_str(), options)?;
    let mut source = BufReader::new(
      File::open(&entry.source).with_context(|| format!("Failed to open {}", entry.source.display()))?,
    );
    io::copy(&mut source, &mut writer)?;

    if let Some(p) = progress.as_mut() {
      p.inc();
    }
  }
  writer.finish()?;

  let sha256 = sha256_file(archive)?;
  info!(path = %archive.display(), entries = plan.entries.len(), "archive written");

  Ok(PackageSummary {
    path: archive.to_path_buf(),
    entries: plan.entries.iter().map(|e| e.name.clone()).collect(),
    missing_files: plan.missing_files.clone(),
    sha256,
  })
}

/// Hex SHA-256 of a file
pub fn sha256_file(path: &Path) -> ShipResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
  let mut hasher = Sha256::new();
  io::copy(&mut file, &mut hasher)?;
  Ok(hex::encode(hasher.finalize()))
}
