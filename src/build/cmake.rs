//! CMake backend for the `Builder` capability

use super::Builder;
use crate::core::error::{BuildError, ShipError, ShipResult, ResultExt};
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Drives `cmake` as a subprocess; compiler output streams to the terminal
pub struct CMakeBuilder {
  program: OsString,
}

impl CMakeBuilder {
  pub fn new() -> Self {
    Self {
      program: OsString::from("cmake"),
    }
  }

  /// Use a specific cmake binary
  pub fn with_program(program: impl Into<OsString>) -> Self {
    Self {
      program: program.into(),
    }
  }

  fn execute(&self, args: &[OsString]) -> ShipResult<()> {
    let command_line = format!(
      "{} {}",
      self.program.to_string_lossy(),
      args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" ")
    );
    info!("running {}", command_line);

    let status = Command::new(&self.program).args(args).status().map_err(|e| {
      ShipError::Build(BuildError::Spawn {
        command: command_line.clone(),
        reason: e.to_string(),
      })
    })?;

    if !status.success() {
      return Err(ShipError::Build(BuildError::Failed {
        command: command_line,
        status: status.code(),
      }));
    }

    Ok(())
  }
}

impl Default for CMakeBuilder {
  fn default() -> Self {
    Self::new()
  }
}

/// Arguments for the configure step
pub fn configure_args(source_dir: &Path, build_dir: &Path, config: &str, extra_args: &[String]) -> Vec<OsString> {
  let mut args: Vec<OsString> = vec![
    "-S".into(),
    source_dir.into(),
    "-B".into(),
    build_dir.into(),
    format!("-DCMAKE_BUILD_TYPE={}", config).into(),
  ];
  args.extend(extra_args.iter().map(OsString::from));
  args
}

/// Arguments for the build step
pub fn build_args(build_dir: &Path, config: &str) -> Vec<OsString> {
  vec!["--build".into(), build_dir.into(), "--config".into(), config.into()]
}

impl Builder for CMakeBuilder {
  fn clean(&self, build_dir: &Path) -> ShipResult<()> {
    if build_dir.exists() {
      debug!(dir = %build_dir.display(), "removing previous build output");
      fs::remove_dir_all(build_dir).with_context(|| format!("Failed to remove {}", build_dir.display()))?;
    }
    Ok(())
  }

  fn configure(&self, source_dir: &Path, build_dir: &Path, config: &str, extra_args: &[String]) -> ShipResult<()> {
    self.execute(&configure_args(source_dir, build_dir, config, extra_args))
  }

  fn build(&self, build_dir: &Path, config: &str) -> ShipResult<()> {
    self.execute(&build_args(build_dir, config))
  }
}
