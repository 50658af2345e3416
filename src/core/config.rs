use crate::core::error::{ConfigError, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default project descriptor file name, relative to the project root
pub const DESCRIPTOR_FILE: &str = "release.json";

/// Build descriptor holding the `project(... VERSION x.y.z)` declaration
pub const VERSION_SOURCE_FILE: &str = "CMakeLists.txt";

/// Plain-text build counter
pub const BUILD_COUNTER_FILE: &str = "build_number.txt";

/// Header template candidates, searched in order
pub const HEADER_TEMPLATE_CANDIDATES: [&str; 3] = ["cmake/version.h.in", "version.h.in", "src/version.h.in"];

/// Build directory used when the descriptor does not name one
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Generated header location, relative to the build directory
pub const GENERATED_HEADER: &str = "generated/version.h";

/// Static per-project packaging configuration
///
/// Authored once by the consuming project and never written by the release
/// pipeline.
///
/// # Example
///
/// ```json
/// {
///   "projectName": "my-tool",
///   "githubRepo": "owner/my-tool",
///   "executables": ["my-tool"],
///   "dlls": ["libfoo"],
///   "packageFiles": ["README.md", "docs"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
  /// Used in the archive name and release title
  pub project_name: String,

  /// Release host repository as `owner/repo`
  pub github_repo: String,

  /// Executables that must exist after the build
  #[serde(default)]
  pub executables: Vec<String>,

  /// Auxiliary libraries, packaged when present
  #[serde(default)]
  pub dlls: Vec<String>,

  /// Extra files or directories, relative to the project root
  #[serde(default)]
  pub package_files: Vec<String>,

  /// Build output directory, relative to the project root
  #[serde(default = "default_build_dir")]
  pub build_dir: PathBuf,

  /// CMake build configuration (`CMAKE_BUILD_TYPE` / `--config`)
  #[serde(default = "default_build_config")]
  pub build_config: String,

  /// Branch the version commit is pushed to
  #[serde(default = "default_branch")]
  pub branch: String,

  /// Remote the branch and tags are pushed to
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Extra arguments for the CMake configure step
  #[serde(default)]
  pub cmake_args: Vec<String>,
}

fn default_build_dir() -> PathBuf {
  PathBuf::from(DEFAULT_BUILD_DIR)
}

fn default_build_config() -> String {
  "Release".to_string()
}

fn default_branch() -> String {
  "main".to_string()
}

fn default_remote() -> String {
  "origin".to_string()
}

impl ProjectDescriptor {
  /// Create a descriptor with defaults for everything but name and repo
  pub fn new(project_name: impl Into<String>, github_repo: impl Into<String>) -> Self {
    Self {
      project_name: project_name.into(),
      github_repo: github_repo.into(),
      executables: Vec::new(),
      dlls: Vec::new(),
      package_files: Vec::new(),
      build_dir: default_build_dir(),
      build_config: default_build_config(),
      branch: default_branch(),
      remote: default_remote(),
      cmake_args: Vec::new(),
    }
  }

  /// Resolve the descriptor path: explicit override, else `release.json` in `root`
  pub fn resolve_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
      Some(path) if path.is_absolute() => path.to_path_buf(),
      Some(path) => root.join(path),
      None => root.join(DESCRIPTOR_FILE),
    }
  }

  /// Load and validate a descriptor
  pub fn load(path: &Path) -> ShipResult<Self> {
    if !path.is_file() {
      return Err(ShipError::Config(ConfigError::DescriptorNotFound {
        path: path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(path).map_err(|e| {
      ShipError::Config(ConfigError::DescriptorInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
      })
    })?;

    Self::parse(&content).map_err(|reason| {
      ShipError::Config(ConfigError::DescriptorInvalid {
        path: path.to_path_buf(),
        reason,
      })
    })
  }

  /// Parse and validate descriptor JSON
  pub fn parse(content: &str) -> Result<Self, String> {
    let descriptor: ProjectDescriptor = serde_json::from_str(content).map_err(|e| e.to_string())?;
    descriptor.validate()?;
    Ok(descriptor)
  }

  /// Validate field contents beyond what serde checks
  pub fn validate(&self) -> Result<(), String> {
    if self.project_name.trim().is_empty() {
      return Err("`projectName` must not be empty".to_string());
    }

    match self.github_repo.split_once('/') {
      Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {}
      _ => {
        return Err(format!(
          "`githubRepo` must look like \"owner/repo\" (got \"{}\")",
          self.github_repo
        ));
      }
    }

    if self.executables.iter().any(|e| e.trim().is_empty()) {
      return Err("`executables` must not contain empty names".to_string());
    }

    if self.build_dir.as_os_str().is_empty() {
      return Err("`buildDir` must not be empty".to_string());
    }

    Ok(())
  }

  /// Serialize for writing a fresh descriptor
  pub fn to_json_pretty(&self) -> ShipResult<String> {
    let mut json = serde_json::to_string_pretty(self)?;
    json.push('\n');
    Ok(json)
  }
}
