//! Post-build artifact verification
//!
//! Executables are mandatory; auxiliary libraries are packaged only if found.

use crate::core::config::ProjectDescriptor;
use crate::core::error::{ShipError, ShipResult};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Artifacts located in the build output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
  pub executables: Vec<PathBuf>,
  pub libraries: Vec<PathBuf>,
  /// Declared libraries that were not found
  pub missing_libraries: Vec<String>,
}

/// Directories searched for executables, most specific first
///
/// Covers single-config generators (`build/bin`, `build`) and multi-config
/// generators (`build/Release`, `build/bin/Release`).
pub fn executable_dirs(build_dir: &Path, config: &str) -> Vec<PathBuf> {
  vec![
    build_dir.join("bin").join(config),
    build_dir.join("bin"),
    build_dir.join(config),
    build_dir.to_path_buf(),
  ]
}

/// Directories searched for libraries
pub fn library_dirs(build_dir: &Path, config: &str) -> Vec<PathBuf> {
  let mut dirs = executable_dirs(build_dir, config);
  dirs.push(build_dir.join("lib").join(config));
  dirs.push(build_dir.join("lib"));
  dirs
}

/// Append the platform suffix when `name` has no extension
fn with_suffix(name: &str, suffix: &str) -> String {
  if suffix.is_empty() || Path::new(name).extension().is_some() {
    name.to_string()
  } else {
    format!("{}{}", name, suffix)
  }
}

pub fn executable_file_name(name: &str) -> String {
  with_suffix(name, std::env::consts::EXE_SUFFIX)
}

pub fn library_file_name(name: &str) -> String {
  with_suffix(name, std::env::consts::DLL_SUFFIX)
}

fn find_in(dirs: &[PathBuf], file_name: &str) -> Option<PathBuf> {
  dirs.iter().map(|d| d.join(file_name)).find(|p| p.is_file())
}

/// Confirm every declared executable exists and collect present libraries
pub fn verify_artifacts(root: &Path, descriptor: &ProjectDescriptor) -> ShipResult<ArtifactSet> {
  let build_dir = root.join(&descriptor.build_dir);
  let exe_dirs = executable_dirs(&build_dir, &descriptor.build_config);
  let lib_dirs = library_dirs(&build_dir, &descriptor.build_config);

  let mut set = ArtifactSet::default();

  for name in &descriptor.executables {
    let file_name = executable_file_name(name);
    match find_in(&exe_dirs, &file_name) {
      Some(path) => {
        debug!(path = %path.display(), "found executable");
        set.executables.push(path);
      }
      None => {
        return Err(ShipError::ArtifactMissing {
          name: file_name.clone(),
          searched: exe_dirs.iter().map(|d| d.join(&file_name)).collect(),
        });
      }
    }
  }

  for name in &descriptor.dlls {
    let file_name = library_file_name(name);
    match find_in(&lib_dirs, &file_name) {
      Some(path) => set.libraries.push(path),
      None => {
        warn!(library = %file_name, "auxiliary library not found in build output, packaging without it");
        set.missing_libraries.push(file_name);
      }
    }
  }

  Ok(set)
}
