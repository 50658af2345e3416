//! Error types for cmake-ship with contextual messages and exit codes
//!
//! Every fatal stage of the release pipeline maps to one category below.
//! Each category carries enough context (file path, command, expected format)
//! for the operator to fix the problem and re-run.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for cmake-ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid descriptor, missing files)
  User = 1,
  /// System error (build tool, git, release host, I/O)
  System = 2,
  /// Validation failure (dirty tree, missing artifacts)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for cmake-ship
#[derive(Debug)]
pub enum ShipError {
  /// Missing or malformed descriptor, version declaration or template
  Config(ConfigError),

  /// Real deploy requested against a dirty working tree
  Precondition(PreconditionError),

  /// External build tool exited non-zero
  Build(BuildError),

  /// A declared executable is absent after the build
  ArtifactMissing { name: String, searched: Vec<PathBuf> },

  /// Commit, push or tag failure
  Git(GitError),

  /// Both release creation and upload to an existing release failed
  ReleaseUpload { tag: String, reason: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ShipError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ShipError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ShipError::Message { message, context, help } => ShipError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ShipError::Io(err) => ShipError::Message {
        message: format!("{}: {}", ctx_str, err),
        context: None,
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ShipError::Config(_) => ExitCode::User,
      ShipError::Precondition(_) => ExitCode::Validation,
      ShipError::Build(_) => ExitCode::System,
      ShipError::ArtifactMissing { .. } => ExitCode::Validation,
      ShipError::Git(_) => ExitCode::System,
      ShipError::ReleaseUpload { .. } => ExitCode::System,
      ShipError::Io(_) => ExitCode::System,
      ShipError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ShipError::Config(e) => e.help_message(),
      ShipError::Precondition(e) => e.help_message(),
      ShipError::Build(_) => Some("Fix the build and re-run; the version bump already written stays in place.".to_string()),
      ShipError::ArtifactMissing { .. } => Some(
        "Check the `executables` list in the project descriptor against the targets your CMake build produces."
          .to_string(),
      ),
      ShipError::Git(e) => e.help_message(),
      ShipError::ReleaseUpload { tag, .. } => Some(format!(
        "Tag {} was removed again. Check `gh auth status` and re-run with --deploy.",
        tag
      )),
      ShipError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ShipError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ShipError::Config(e) => write!(f, "{}", e),
      ShipError::Precondition(e) => write!(f, "{}", e),
      ShipError::Build(e) => write!(f, "{}", e),
      ShipError::ArtifactMissing { name, searched } => {
        write!(f, "Executable '{}' not found in build output. Searched:", name)?;
        for path in searched {
          write!(f, "\n  {}", path.display())?;
        }
        Ok(())
      }
      ShipError::Git(e) => write!(f, "{}", e),
      ShipError::ReleaseUpload { tag, reason } => {
        write!(f, "Release upload for {} failed: {}", tag, reason)
      }
      ShipError::Io(e) => write!(f, "I/O error: {}", e),
      ShipError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ShipError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ShipError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ShipError {
  fn from(err: io::Error) -> Self {
    ShipError::Io(err)
  }
}

impl From<String> for ShipError {
  fn from(msg: String) -> Self {
    ShipError::message(msg)
  }
}

impl From<&str> for ShipError {
  fn from(msg: &str) -> Self {
    ShipError::message(msg)
  }
}

impl From<ConfigError> for ShipError {
  fn from(err: ConfigError) -> Self {
    ShipError::Config(err)
  }
}

impl From<GitError> for ShipError {
  fn from(err: GitError) -> Self {
    ShipError::Git(err)
  }
}

impl From<BuildError> for ShipError {
  fn from(err: BuildError) -> Self {
    ShipError::Build(err)
  }
}

impl From<serde_json::Error> for ShipError {
  fn from(err: serde_json::Error) -> Self {
    ShipError::message(format!("JSON error: {}", err))
  }
}

impl From<regex::Error> for ShipError {
  fn from(err: regex::Error) -> Self {
    ShipError::message(format!("Regex error: {}", err))
  }
}

impl From<zip::result::ZipError> for ShipError {
  fn from(err: zip::result::ZipError) -> Self {
    ShipError::message(format!("Archive error: {}", err))
  }
}

impl From<walkdir::Error> for ShipError {
  fn from(err: walkdir::Error) -> Self {
    ShipError::message(format!("Directory walk error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Project descriptor not found
  DescriptorNotFound { path: PathBuf },

  /// Project descriptor could not be parsed or failed validation
  DescriptorInvalid { path: PathBuf, reason: String },

  /// No `project(... VERSION x.y.z)` declaration in the build descriptor
  VersionNotFound { path: PathBuf },

  /// No header template at any candidate path
  TemplateNotFound { searched: Vec<PathBuf> },

  /// A stored number is already at the largest representable value
  ValueOverflow { path: PathBuf, field: &'static str },
}

/// Expected shape of the project descriptor, shown when it is missing or broken
pub const DESCRIPTOR_EXAMPLE: &str = r#"{
  "projectName": "my-tool",
  "githubRepo": "owner/my-tool",
  "executables": ["my-tool"],
  "dlls": [],
  "packageFiles": ["README.md", "LICENSE"]
}"#;

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::DescriptorNotFound { .. } | ConfigError::DescriptorInvalid { .. } => Some(format!(
        "Run `cmake-ship init` or create the descriptor by hand. Expected shape:\n{}",
        DESCRIPTOR_EXAMPLE
      )),
      ConfigError::VersionNotFound { .. } => {
        Some("Declare the version in CMakeLists.txt, e.g. `project(my-tool VERSION 0.1.0 LANGUAGES CXX)`.".to_string())
      }
      ConfigError::TemplateNotFound { .. } => {
        Some("Run `cmake-ship init` to create cmake/version.h.in.".to_string())
      }
      ConfigError::ValueOverflow { path, .. } => Some(format!("Set a smaller value in {} and re-run.", path.display())),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::DescriptorNotFound { path } => {
        write!(f, "Project descriptor not found: {}", path.display())
      }
      ConfigError::DescriptorInvalid { path, reason } => {
        write!(f, "Invalid project descriptor {}: {}", path.display(), reason)
      }
      ConfigError::VersionNotFound { path } => {
        write!(
          f,
          "No `project(<name> VERSION <major>.<minor>.<patch>)` declaration found in {}",
          path.display()
        )
      }
      ConfigError::ValueOverflow { path, field } => {
        write!(f, "{} in {} cannot be incremented past {}", field, path.display(), u64::MAX)
      }
      ConfigError::TemplateNotFound { searched } => {
        write!(f, "Version header template not found. Searched:")?;
        for path in searched {
          write!(f, "\n  {}", path.display())?;
        }
        Ok(())
      }
    }
  }
}

/// Preconditions checked before any mutation
#[derive(Debug)]
pub enum PreconditionError {
  /// Working tree differs from HEAD
  DirtyWorkingTree,
}

impl PreconditionError {
  fn help_message(&self) -> Option<String> {
    match self {
      PreconditionError::DirtyWorkingTree => {
        Some("Commit or stash your changes first, or drop --deploy for a dry run.".to_string())
      }
    }
  }
}

impl fmt::Display for PreconditionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PreconditionError::DirtyWorkingTree => {
        write!(f, "Working tree has uncommitted changes; refusing to deploy")
      }
    }
  }
}

/// External build tool failures
#[derive(Debug)]
pub enum BuildError {
  /// Tool could not be started at all
  Spawn { command: String, reason: String },

  /// Tool exited non-zero; its output already went to the terminal
  Failed { command: String, status: Option<i32> },
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::Spawn { command, reason } => {
        write!(f, "Failed to run `{}`: {}", command, reason)
      }
      BuildError::Failed { command, status } => match status {
        Some(code) => write!(f, "Build command failed (exit {}): {}", code, command),
        None => write!(f, "Build command terminated by signal: {}", command),
      },
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Push failed
  PushFailed {
    remote: String,
    refspec: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote has commits you don't have. Pull and re-run the release.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key or credential helper for the remote.".to_string())
        } else {
          None
        }
      }
      GitError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr.trim_end())
      }
      GitError::PushFailed { remote, refspec, reason } => {
        write!(f, "Push of {} to {} failed: {}", refspec, remote, reason.trim_end())
      }
    }
  }
}

/// Result type alias for cmake-ship
pub type ShipResult<T> = Result<T, ShipError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ShipResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ShipError>,
{
  fn context(self, ctx: impl Into<String>) -> ShipResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ShipResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ShipError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}

impl From<anyhow::Error> for ShipError {
  fn from(err: anyhow::Error) -> Self {
    ShipError::message(err.to_string())
  }
}
