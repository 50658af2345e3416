//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_bootstraps_project() -> Result<()> {
  let project = TestProject::bare()?;
  project.write_file("CMakeLists.txt", CMAKE_LISTS)?;

  run_cmake_ship(&project.path, &["init", "--repo", "acme/demo"])?;

  for file in [
    "CMakePresets.json",
    "cmake/version.h.in",
    "cmake/ShipVersion.cmake",
    "release.json",
    "build_number.txt",
    ".gitignore",
  ] {
    assert!(project.file_exists(file), "{} missing", file);
  }

  let descriptor: serde_json::Value = serde_json::from_str(&project.read_file("release.json")?)?;
  assert_eq!(descriptor["projectName"], "demo");
  assert_eq!(descriptor["githubRepo"], "acme/demo");
  assert_eq!(project.read_file("build_number.txt")?, "0\n");

  let presets: serde_json::Value = serde_json::from_str(&project.read_file("CMakePresets.json")?)?;
  assert!(presets["configurePresets"].is_array());

  Ok(())
}

#[test]
fn test_init_twice_changes_nothing() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(".gitignore", "/build/\n")?;

  run_cmake_ship(&project.path, &["init"])?;
  let descriptor = project.read_file("release.json")?;
  let gitignore = project.read_file(".gitignore")?;

  // Existing descriptor and counter are kept
  assert_eq!(descriptor, DESCRIPTOR);
  assert_eq!(project.read_file("build_number.txt")?, "5\n");
  assert!(gitignore.contains("*.zip"));

  let output = run_cmake_ship(&project.path, &["init"])?;
  assert!(stdout(&output).contains("already exists"));
  assert_eq!(project.read_file(".gitignore")?, gitignore);

  Ok(())
}

#[test]
fn test_header_works_after_init() -> Result<()> {
  let project = TestProject::bare()?;
  project.write_file("CMakeLists.txt", CMAKE_LISTS)?;
  run_cmake_ship(&project.path, &["init", "--name", "demo", "--repo", "acme/demo"])?;

  run_cmake_ship(&project.path, &["header"])?;
  let header = project.read_file("build/generated/version.h")?;
  assert!(header.contains("#define VERSION_FULL \"0.1.2+0.unknown\""));
  assert!(header.contains("print_version"));

  Ok(())
}
