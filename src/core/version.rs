//! Version arithmetic and the composite version string

use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit id used when git cannot tell us one
pub const UNKNOWN_COMMIT: &str = "unknown";

/// Version bump requested for a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
  /// `(M+1, 0, 0)`, counter reset
  Major,
  /// `(M, m+1, 0)`, counter reset
  Minor,
  /// `(M, m, p+1)`, counter incremented
  Patch,
  /// Version and counter unchanged
  #[default]
  None,
}

impl VersionBump {
  /// Apply bump to a semver version; `None` when the bumped part would overflow
  pub fn apply(&self, version: &semver::Version) -> Option<semver::Version> {
    let (major, minor, patch) = (version.major, version.minor, version.patch);
    let bumped = match self {
      VersionBump::Major => semver::Version::new(major.checked_add(1)?, 0, 0),
      VersionBump::Minor => semver::Version::new(major, minor.checked_add(1)?, 0),
      VersionBump::Patch => semver::Version::new(major, minor, patch.checked_add(1)?),
      VersionBump::None => semver::Version::new(major, minor, patch),
    };
    Some(bumped)
  }

  /// Next build counter value for this bump; `None` on overflow
  pub fn next_build(&self, build: u64) -> Option<u64> {
    match self {
      VersionBump::Major | VersionBump::Minor => Some(0),
      VersionBump::Patch => build.checked_add(1),
      VersionBump::None => Some(build),
    }
  }

  /// Pick the bump from mutually exclusive CLI flags
  ///
  /// clap already rejects combinations; this is the library-level check.
  pub fn from_flags(major: bool, minor: bool, patch: bool) -> Option<Self> {
    match (major, minor, patch) {
      (false, false, false) => Some(VersionBump::None),
      (true, false, false) => Some(VersionBump::Major),
      (false, true, false) => Some(VersionBump::Minor),
      (false, false, true) => Some(VersionBump::Patch),
      _ => None,
    }
  }
}

impl fmt::Display for VersionBump {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      VersionBump::Major => "major",
      VersionBump::Minor => "minor",
      VersionBump::Patch => "patch",
      VersionBump::None => "none",
    };
    f.write_str(name)
  }
}

/// Live state of the working copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitState {
  /// Short commit hash, or `unknown`
  pub commit: String,
  pub dirty: bool,
}

impl GitState {
  pub fn new(commit: Option<String>, dirty: bool) -> Self {
    Self {
      commit: commit
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_COMMIT.to_string()),
      dirty,
    }
  }
}

/// `MAJOR.MINOR.PATCH+BUILD.COMMIT[-dirty]`
///
/// Derived on every run, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeVersion {
  pub version: semver::Version,
  pub build: u64,
  pub git: GitState,
}

impl CompositeVersion {
  pub fn new(version: semver::Version, build: u64, git: GitState) -> Self {
    Self { version, build, git }
  }

  /// `MAJOR.MINOR.PATCH` only
  pub fn triple(&self) -> String {
    format!("{}.{}.{}", self.version.major, self.version.minor, self.version.patch)
  }

  /// Release tag name, `v{MAJOR.MINOR.PATCH}`
  pub fn tag_name(&self) -> String {
    format!("v{}", self.triple())
  }
}

impl fmt::Display for CompositeVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}+{}.{}", self.triple(), self.build, self.git.commit)?;
    if self.git.dirty {
      f.write_str("-dirty")?;
    }
    Ok(())
  }
}

impl Serialize for CompositeVersion {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
