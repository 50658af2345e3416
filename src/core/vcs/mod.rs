pub mod system_git;
mod system_git_ops;

use crate::core::error::ShipResult;
use std::path::PathBuf;

pub use system_git::SystemGit;

/// Source-control operations the release pipeline depends on
///
/// Queries fail soft (`None` / `false`); mutations report errors so the
/// pipeline can halt with a git failure.
pub trait SourceControl {
  /// Short hash of HEAD, `None` when it cannot be determined
  fn short_commit(&self) -> Option<String>;

  /// Whether the working tree differs from HEAD
  fn is_dirty(&self) -> bool;

  /// Stage and commit exactly these paths
  fn commit_paths(&self, paths: &[PathBuf], message: &str) -> ShipResult<()>;

  fn push_branch(&self, remote: &str, branch: &str) -> ShipResult<()>;

  /// Create an annotated tag on HEAD
  fn create_tag(&self, tag: &str, message: &str) -> ShipResult<()>;

  fn push_tag(&self, remote: &str, tag: &str) -> ShipResult<()>;

  fn delete_local_tag(&self, tag: &str) -> ShipResult<()>;

  fn delete_remote_tag(&self, remote: &str, tag: &str) -> ShipResult<()>;
}
