//! System git backend
//!
//! Every query is a fresh subprocess; nothing about the repository is cached
//! between calls.

use crate::core::error::{GitError, ShipError, ShipResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Git backend using the system `git` binary
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Point at a working copy. Does not require the path to be a repository;
  /// queries against a non-repository simply fail soft.
  pub fn new(path: &Path) -> Self {
    Self {
      repo_path: path.to_path_buf(),
    }
  }

  /// Get the short hash of HEAD
  pub fn head_short(&self) -> Option<String> {
    let output = self.git_cmd().args(["rev-parse", "--short", "HEAD"]).output().ok()?;

    if !output.status.success() {
      debug!(
        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
        "git rev-parse --short HEAD failed"
      );
      return None;
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() { None } else { Some(sha) }
  }

  /// Check whether tracked files differ from HEAD
  ///
  /// `git diff-index --quiet` exits 1 for differences and 0 for none; any
  /// other outcome (no repository, no HEAD yet, git missing) reads as clean.
  pub fn has_changes(&self) -> bool {
    // Refresh stat info so touched-but-identical files don't read as modified
    let _ = self.git_cmd().args(["update-index", "-q", "--refresh"]).output();

    match self.git_cmd().args(["diff-index", "--quiet", "HEAD", "--"]).output() {
      Ok(output) => output.status.code() == Some(1),
      Err(e) => {
        debug!(error = %e, "git diff-index could not run");
        false
      }
    }
  }

  /// Run a git command and turn a non-zero exit into a `GitError`
  pub(crate) fn run(&self, args: &[&str]) -> ShipResult<Output> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .map_err(|e| ShipError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: e.to_string(),
      }))?;

    if !output.status.success() {
      return Err(ShipError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(output)
  }

  /// Create a git command rooted at the repository
  ///
  /// - Sets working directory to repo path
  /// - Never prompts for credentials
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  fn git(path: &Path, args: &[&str]) {
    let status = Command::new("git").current_dir(path).args(args).output().unwrap();
    assert!(status.status.success(), "git {:?} failed", args);
  }

  fn repo_with_commit() -> TempDir {
    let temp = TempDir::new().unwrap();
    git(temp.path(), &["init", "--initial-branch=main"]);
    git(temp.path(), &["config", "user.name", "Test User"]);
    git(temp.path(), &["config", "user.email", "test@example.com"]);
    fs::write(temp.path().join("a.txt"), "a\n").unwrap();
    git(temp.path(), &["add", "."]);
    git(temp.path(), &["commit", "-m", "init"]);
    temp
  }

  #[test]
  fn test_non_repository_fails_soft() {
    let temp = TempDir::new().unwrap();
    let git = SystemGit::new(temp.path());
    assert_eq!(git.head_short(), None);
    assert!(!git.has_changes());
  }

  #[test]
  fn test_head_short_and_dirty_detection() {
    let repo = repo_with_commit();
    let git = SystemGit::new(repo.path());

    let sha = git.head_short().unwrap();
    assert!(sha.len() >= 7);
    assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(!git.has_changes());

    // Untracked files don't count
    fs::write(repo.path().join("new.txt"), "n\n").unwrap();
    assert!(!git.has_changes());

    fs::write(repo.path().join("a.txt"), "changed\n").unwrap();
    assert!(git.has_changes());
  }
}
