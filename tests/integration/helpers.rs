//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const CMAKE_LISTS: &str = "cmake_minimum_required(VERSION 3.20)\nproject(demo VERSION 0.1.2 LANGUAGES CXX)\nadd_executable(demo main.cpp)\n";

pub const DESCRIPTOR: &str = r#"{
  "projectName": "demo",
  "githubRepo": "acme/demo",
  "executables": ["demo"],
  "packageFiles": ["README.md"]
}
"#;

/// A CMake project under git with one commit
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Project with CMakeLists.txt, a counter of 5, release.json and README
  pub fn new() -> Result<Self> {
    let project = Self::bare()?;

    git(&project.path, &["init", "--initial-branch=main"])?;
    git(&project.path, &["config", "user.name", "Test User"])?;
    git(&project.path, &["config", "user.email", "test@example.com"])?;

    project.write_file("CMakeLists.txt", CMAKE_LISTS)?;
    project.write_file("build_number.txt", "5\n")?;
    project.write_file("release.json", DESCRIPTOR)?;
    project.write_file("README.md", "# demo\n")?;
    project.write_file(".gitignore", "/build/\n*.zip\n")?;
    project.commit("Initial project")?;

    Ok(project)
  }

  /// Empty directory, not a git repository
  pub fn bare() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Commit everything, returning the short hash
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;
    self.short_head()
  }

  pub fn short_head(&self) -> Result<String> {
    let output = git(&self.path, &["rev-parse", "--short", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run cmake-ship and return its output whatever the exit status
pub fn cmake_ship_output(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_cmake-ship"))
    .current_dir(cwd)
    .args(args)
    .env_remove("CMAKE_SHIP_CONFIG")
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run cmake-ship")
}

/// Run cmake-ship CLI command, failing on a non-zero exit
pub fn run_cmake_ship(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = cmake_ship_output(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "cmake-ship command failed: cmake-ship {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).trim().to_string()
}
