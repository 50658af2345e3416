//! Composite version resolution shared by `version`, `header` and `release`

use crate::core::config::{BUILD_COUNTER_FILE, VERSION_SOURCE_FILE};
use crate::core::error::ShipResult;
use crate::core::registers::{BuildCounter, CounterReading, VersionDeclaration};
use crate::core::vcs::SourceControl;
use crate::core::version::{CompositeVersion, GitState};
use serde::Serialize;
use std::path::Path;

/// Everything the header and the release pipeline need to know about the
/// current version
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedVersion {
  /// Name from the `project()` declaration
  pub project: String,
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
  pub build: u64,
  pub commit: String,
  pub dirty: bool,
  /// `MAJOR.MINOR.PATCH+BUILD.COMMIT[-dirty]`
  pub full: CompositeVersion,
}

impl ResolvedVersion {
  pub fn new(project: impl Into<String>, composite: CompositeVersion) -> Self {
    Self {
      project: project.into(),
      major: composite.version.major,
      minor: composite.version.minor,
      patch: composite.version.patch,
      build: composite.build,
      commit: composite.git.commit.clone(),
      dirty: composite.git.dirty,
      full: composite,
    }
  }
}

/// Reads the version triple, the build counter and the live git state
pub struct VersionResolver<'a> {
  pub declaration: VersionDeclaration,
  pub counter: BuildCounter,
  scm: &'a dyn SourceControl,
}

impl<'a> VersionResolver<'a> {
  /// Resolver over the standard file locations under `root`
  pub fn new(root: &Path, scm: &'a dyn SourceControl) -> Self {
    Self {
      declaration: VersionDeclaration::new(root.join(VERSION_SOURCE_FILE)),
      counter: BuildCounter::new(root.join(BUILD_COUNTER_FILE)),
      scm,
    }
  }

  /// Query commit id and dirty flag, never failing
  pub fn git_state(&self) -> GitState {
    GitState::new(self.scm.short_commit(), self.scm.is_dirty())
  }

  pub fn read_counter(&self) -> ShipResult<CounterReading> {
    self.counter.load()
  }

  /// Resolve all fields
  pub fn resolve(&self) -> ShipResult<ResolvedVersion> {
    let declaration = self.declaration.read()?;
    let build = self.counter.load()?.value;
    let composite = CompositeVersion::new(declaration.version, build, self.git_state());
    Ok(ResolvedVersion::new(declaration.project, composite))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::error::{ConfigError, ShipError};
  use std::fs;
  use std::path::PathBuf;
  use tempfile::TempDir;

  /// Query-only source control double
  struct FixedScm {
    commit: Option<String>,
    dirty: bool,
  }

  impl SourceControl for FixedScm {
    fn short_commit(&self) -> Option<String> {
      self.commit.clone()
    }
    fn is_dirty(&self) -> bool {
      self.dirty
    }
    fn commit_paths(&self, _paths: &[PathBuf], _message: &str) -> ShipResult<()> {
      unreachable!("query-only fake")
    }
    fn push_branch(&self, _remote: &str, _branch: &str) -> ShipResult<()> {
      unreachable!("query-only fake")
    }
    fn create_tag(&self, _tag: &str, _message: &str) -> ShipResult<()> {
      unreachable!("query-only fake")
    }
    fn push_tag(&self, _remote: &str, _tag: &str) -> ShipResult<()> {
      unreachable!("query-only fake")
    }
    fn delete_local_tag(&self, _tag: &str) -> ShipResult<()> {
      unreachable!("query-only fake")
    }
    fn delete_remote_tag(&self, _remote: &str, _tag: &str) -> ShipResult<()> {
      unreachable!("query-only fake")
    }
  }

  fn project(version: &str, counter: Option<&str>) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(
      temp.path().join(VERSION_SOURCE_FILE),
      format!("project(demo VERSION {} LANGUAGES CXX)\n", version),
    )
    .unwrap();
    if let Some(counter) = counter {
      fs::write(temp.path().join(BUILD_COUNTER_FILE), counter).unwrap();
    }
    temp
  }

  #[test]
  fn test_resolve_clean_tree() {
    let temp = project("0.1.2", Some("5\n"));
    let scm = FixedScm {
      commit: Some("abc1234".into()),
      dirty: false,
    };

    let resolved = VersionResolver::new(temp.path(), &scm).resolve().unwrap();
    assert_eq!(resolved.project, "demo");
    assert_eq!((resolved.major, resolved.minor, resolved.patch), (0, 1, 2));
    assert_eq!(resolved.build, 5);
    assert_eq!(resolved.full.to_string(), "0.1.2+5.abc1234");
  }

  #[test]
  fn test_resolve_without_git_uses_sentinel() {
    let temp = project("1.0.0", None);
    let scm = FixedScm {
      commit: None,
      dirty: true,
    };

    let resolved = VersionResolver::new(temp.path(), &scm).resolve().unwrap();
    assert_eq!(resolved.full.to_string(), "1.0.0+0.unknown-dirty");
    assert_eq!(fs::read_to_string(temp.path().join(BUILD_COUNTER_FILE)).unwrap().trim(), "0");
  }

  #[test]
  fn test_resolve_missing_declaration_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(VERSION_SOURCE_FILE), "project(demo)\n").unwrap();
    let scm = FixedScm {
      commit: None,
      dirty: false,
    };

    let err = VersionResolver::new(temp.path(), &scm).resolve().unwrap_err();
    assert!(matches!(err, ShipError::Config(ConfigError::VersionNotFound { .. })));
  }
}
