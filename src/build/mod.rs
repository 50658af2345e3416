//! Rebuild and artifact verification
//!
//! - **cmake**: the `Builder` backend that shells out to `cmake`
//! - **artifacts**: locating declared executables and libraries after a build

pub mod artifacts;
pub mod cmake;

use crate::core::error::ShipResult;
use std::path::Path;

pub use artifacts::{ArtifactSet, verify_artifacts};
pub use cmake::CMakeBuilder;

/// External build tool the release pipeline drives
pub trait Builder {
  /// Remove any previous build output
  fn clean(&self, build_dir: &Path) -> ShipResult<()>;

  /// Configure step (`cmake -S -B`)
  fn configure(&self, source_dir: &Path, build_dir: &Path, config: &str, extra_args: &[String]) -> ShipResult<()>;

  /// Build step (`cmake --build`)
  fn build(&self, build_dir: &Path, config: &str) -> ShipResult<()>;
}
