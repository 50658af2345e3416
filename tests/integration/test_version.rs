//! Tests for the `version` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_version_clean_tree() -> Result<()> {
  let project = TestProject::new()?;
  let head = project.short_head()?;

  let output = run_cmake_ship(&project.path, &["version"])?;
  assert_eq!(stdout(&output), format!("0.1.2+5.{}", head));

  // Reading never bumps anything
  assert_eq!(project.read_file("build_number.txt")?, "5\n");

  Ok(())
}

#[test]
fn test_version_dirty_tree() -> Result<()> {
  let project = TestProject::new()?;
  let head = project.short_head()?;
  project.write_file("README.md", "# demo\n\nedited\n")?;

  let output = run_cmake_ship(&project.path, &["version"])?;
  assert_eq!(stdout(&output), format!("0.1.2+5.{}-dirty", head));

  Ok(())
}

#[test]
fn test_untracked_files_do_not_make_tree_dirty() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("scratch.txt", "notes")?;

  let output = run_cmake_ship(&project.path, &["version"])?;
  assert!(!stdout(&output).ends_with("-dirty"));

  Ok(())
}

#[test]
fn test_version_outside_git_uses_unknown_and_creates_counter() -> Result<()> {
  let project = TestProject::bare()?;
  project.write_file("CMakeLists.txt", CMAKE_LISTS)?;

  let output = run_cmake_ship(&project.path, &["version"])?;
  assert_eq!(stdout(&output), "0.1.2+0.unknown");
  assert_eq!(project.read_file("build_number.txt")?.trim(), "0");

  Ok(())
}

#[test]
fn test_version_resets_malformed_counter() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("build_number.txt", "not a number")?;

  let output = run_cmake_ship(&project.path, &["version"])?;
  assert!(stdout(&output).starts_with("0.1.2+0."));
  assert_eq!(project.read_file("build_number.txt")?.trim(), "0");

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("treating as 0"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_version_json_lists_every_field() -> Result<()> {
  let project = TestProject::new()?;
  let head = project.short_head()?;

  let output = run_cmake_ship(&project.path, &["version", "--json"])?;
  let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(json["project"], "demo");
  assert_eq!(json["major"], 0);
  assert_eq!(json["minor"], 1);
  assert_eq!(json["patch"], 2);
  assert_eq!(json["build"], 5);
  assert_eq!(json["commit"], head.as_str());
  assert_eq!(json["dirty"], false);
  assert_eq!(json["full"], format!("0.1.2+5.{}", head));

  Ok(())
}

#[test]
fn test_version_with_directory_flag() -> Result<()> {
  let project = TestProject::new()?;
  let elsewhere = TestProject::bare()?;
  let dir = project.path.to_string_lossy().to_string();

  let output = run_cmake_ship(&elsewhere.path, &["-C", &dir, "version"])?;
  assert!(stdout(&output).starts_with("0.1.2+5."));

  Ok(())
}

#[test]
fn test_version_without_declaration_fails() -> Result<()> {
  let project = TestProject::bare()?;
  project.write_file("CMakeLists.txt", "project(demo LANGUAGES C)\n")?;

  let output = cmake_ship_output(&project.path, &["version"])?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("VERSION"), "stderr: {}", stderr);

  Ok(())
}
