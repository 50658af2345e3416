//! Tests for the `release` command
//!
//! These cover the paths that halt before the build tool runs; the full
//! pipeline is exercised with fakes in the unit tests.

use crate::helpers::*;
use anyhow::Result;
use std::process::Command;

#[test]
fn test_deploy_on_dirty_tree_changes_nothing() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("README.md", "# demo\n\nuncommitted\n")?;
  let cmake_before = project.read_file("CMakeLists.txt")?;

  let output = cmake_ship_output(&project.path, &["release", "--patch", "--deploy"])?;
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("uncommitted"), "stderr: {}", stderr);

  assert_eq!(project.read_file("CMakeLists.txt")?, cmake_before);
  assert_eq!(project.read_file("build_number.txt")?, "5\n");
  assert!(!project.file_exists("build"));

  Ok(())
}

#[test]
fn test_missing_descriptor_is_user_error() -> Result<()> {
  let project = TestProject::new()?;
  std::fs::remove_file(project.path.join("release.json"))?;

  let output = cmake_ship_output(&project.path, &["release", "--patch"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("projectName"), "help should show the expected shape: {}", stderr);
  assert_eq!(project.read_file("build_number.txt")?, "5\n");

  Ok(())
}

#[test]
fn test_two_bump_flags_are_a_usage_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = cmake_ship_output(&project.path, &["release", "--major", "--minor"])?;
  assert_eq!(output.status.code(), Some(2));
  assert_eq!(project.read_file("CMakeLists.txt")?, CMAKE_LISTS);

  Ok(())
}

#[test]
fn test_config_override_from_environment() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("ci/ship.json", "{ broken")?;

  let output = Command::new(env!("CARGO_BIN_EXE_cmake-ship"))
    .current_dir(&project.path)
    .args(["release"])
    .env("CMAKE_SHIP_CONFIG", "ci/ship.json")
    .output()?;

  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("ship.json"), "stderr: {}", stderr);
  assert_eq!(project.read_file("build_number.txt")?, "5\n");

  Ok(())
}

#[test]
fn test_invalid_repo_in_descriptor_is_rejected() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("custom.json", r#"{"projectName": "demo", "githubRepo": "demo"}"#)?;

  let output = cmake_ship_output(&project.path, &["release", "--config", "custom.json"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("owner/repo"));

  Ok(())
}
