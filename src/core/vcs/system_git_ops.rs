//! Mutating operations for SystemGit (commit, push, tags)

use super::SourceControl;
use super::system_git::SystemGit;
use crate::core::error::{GitError, ShipError, ShipResult};
use crate::utils::path_to_git_format;
use std::path::PathBuf;
use tracing::info;

impl SystemGit {
    fn push(&self, remote: &str, refspec: &str) -> ShipResult<()> {
        info!("pushing {} to {}", refspec, remote);

        let output = self
            .git_cmd()
            .args(["push", remote, refspec])
            .output()
            .map_err(|e| ShipError::Git(GitError::PushFailed {
                remote: remote.to_string(),
                refspec: refspec.to_string(),
                reason: e.to_string(),
            }))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ShipError::Git(GitError::PushFailed {
                remote: remote.to_string(),
                refspec: refspec.to_string(),
                reason: stderr.to_string(),
            }));
        }

        Ok(())
    }

    /// `git diff --cached --quiet` exits 1 when the index differs from HEAD
    fn has_staged_changes(&self, specs: &[String]) -> ShipResult<bool> {
        let mut args = vec!["diff", "--cached", "--quiet", "--"];
        args.extend(specs.iter().map(String::as_str));

        let output = self.git_cmd().args(&args).output().map_err(|e| {
            ShipError::Git(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: e.to_string(),
            })
        })?;

        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(ShipError::Git(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })),
        }
    }
}

impl SourceControl for SystemGit {
    fn short_commit(&self) -> Option<String> {
        self.head_short()
    }

    fn is_dirty(&self) -> bool {
        self.has_changes()
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> ShipResult<()> {
        let specs: Vec<String> = paths.iter().map(|p| path_to_git_format(p)).collect();

        let mut add = vec!["add", "--"];
        add.extend(specs.iter().map(String::as_str));
        self.run(&add)?;

        if !self.has_staged_changes(&specs)? {
            info!("{} unchanged, nothing to commit", specs.join(", "));
            return Ok(());
        }

        let mut commit = vec!["commit", "-m", message, "--"];
        commit.extend(specs.iter().map(String::as_str));
        self.run(&commit)?;

        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> ShipResult<()> {
        self.push(remote, branch)
    }

    fn create_tag(&self, tag: &str, message: &str) -> ShipResult<()> {
        self.run(&["tag", "-a", tag, "-m", message])?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, tag: &str) -> ShipResult<()> {
        self.push(remote, &format!("refs/tags/{}", tag))
    }

    fn delete_local_tag(&self, tag: &str) -> ShipResult<()> {
        self.run(&["tag", "-d", tag])?;
        Ok(())
    }

    fn delete_remote_tag(&self, remote: &str, tag: &str) -> ShipResult<()> {
        self.push(remote, &format!(":refs/tags/{}", tag))
    }
}
