//! `cmake-ship header`

use crate::core::config::{DEFAULT_BUILD_DIR, DESCRIPTOR_FILE, GENERATED_HEADER, ProjectDescriptor};
use crate::core::error::ShipResult;
use crate::core::resolver::VersionResolver;
use crate::core::vcs::SystemGit;
use crate::header::generate_header;
use crate::utils::path_to_git_format;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default header path: `<buildDir>/generated/version.h`
///
/// `buildDir` comes from the descriptor when one exists; the header is also
/// generated at configure time in projects that have not set up releases yet.
fn default_output(root: &Path) -> ShipResult<PathBuf> {
  let descriptor_path = root.join(DESCRIPTOR_FILE);
  let build_dir = if descriptor_path.is_file() {
    ProjectDescriptor::load(&descriptor_path)?.build_dir
  } else {
    debug!("no {}, using the default build directory", DESCRIPTOR_FILE);
    PathBuf::from(DEFAULT_BUILD_DIR)
  };
  Ok(root.join(build_dir).join(GENERATED_HEADER))
}

/// Regenerate the version header and print its include directory
pub fn run_header(root: &Path, output: Option<PathBuf>) -> ShipResult<()> {
  let output = match output {
    Some(path) if path.is_absolute() => path,
    Some(path) => root.join(path),
    None => default_output(root)?,
  };

  let git = SystemGit::new(root);
  let resolved = VersionResolver::new(root, &git).resolve()?;
  let include_dir = generate_header(root, &output, &resolved)?;

  // CMake reads this line back with execute_process
  println!("{}", path_to_git_format(&include_dir));
  Ok(())
}
