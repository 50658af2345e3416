//! Release host capability and the GitHub CLI backend

use crate::core::error::{ShipError, ShipResult};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// A release to create on the host
#[derive(Debug, Clone)]
pub struct ReleaseDraft<'a> {
  /// `owner/repo`
  pub repo: &'a str,
  pub tag: &'a str,
  pub title: &'a str,
  pub notes: &'a str,
}

/// Service hosting tagged release artifacts
pub trait ReleaseHost {
  /// Create a new release for `draft.tag` with `asset` attached
  fn create_release(&self, draft: &ReleaseDraft<'_>, asset: &Path) -> ShipResult<()>;

  /// Upload `asset` to the existing release for `tag`, replacing a same-named asset
  fn upload_asset(&self, repo: &str, tag: &str, asset: &Path) -> ShipResult<()>;
}

/// `gh` command-line backend
pub struct GhCli;

impl GhCli {
  /// `gh release <action> <tag> <asset> <flags...>`
  fn release(&self, action: &str, tag: &str, asset: &Path, flags: &[&str]) -> ShipResult<()> {
    let command = format!("gh release {} {} {} {}", action, tag, asset.display(), flags.join(" "));

    let output = Command::new("gh")
      .args(["release", action, tag])
      .arg(asset)
      .args(flags)
      .output()
      .map_err(|e| ShipError::message(format!("Failed to run `{}`: {}", command, e)))?;

    if !output.status.success() {
      return Err(ShipError::message(format!(
        "`{}` failed: {}",
        command,
        String::from_utf8_lossy(&output.stderr).trim()
      )));
    }

    Ok(())
  }
}

impl ReleaseHost for GhCli {
  fn create_release(&self, draft: &ReleaseDraft<'_>, asset: &Path) -> ShipResult<()> {
    info!("creating release {} on {}", draft.tag, draft.repo);
    self.release(
      "create",
      draft.tag,
      asset,
      &["--repo", draft.repo, "--title", draft.title, "--notes", draft.notes],
    )
  }

  fn upload_asset(&self, repo: &str, tag: &str, asset: &Path) -> ShipResult<()> {
    info!("uploading {} to existing release {}", asset.display(), tag);
    self.release("upload", tag, asset, &["--repo", repo, "--clobber"])
  }
}
