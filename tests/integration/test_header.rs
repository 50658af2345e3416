//! Tests for the `header` command

use crate::helpers::*;
use anyhow::Result;

const TEMPLATE: &str = "#define VERSION_FULL \"@VERSION_FULL@\"\n#define VERSION_BUILD @VERSION_BUILD@\n#define KEEP @NOT_A_FIELD@\n";

#[test]
fn test_header_written_to_default_location() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("cmake/version.h.in", TEMPLATE)?;
  let head = project.short_head()?;

  let output = run_cmake_ship(&project.path, &["header"])?;
  assert!(stdout(&output).ends_with("build/generated"), "stdout: {}", stdout(&output));

  // An untracked template does not make the tree dirty
  let header = project.read_file("build/generated/version.h")?;
  assert!(header.contains(&format!("#define VERSION_FULL \"0.1.2+5.{}\"", head)));
  assert!(header.contains("#define VERSION_BUILD 5"));
  assert!(header.contains("@NOT_A_FIELD@"));

  Ok(())
}

#[test]
fn test_header_is_byte_identical_across_runs() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("version.h.in", TEMPLATE)?;
  project.commit("Add template")?;

  run_cmake_ship(&project.path, &["header", "--output", "out/version.h"])?;
  let first = std::fs::read(project.path.join("out/version.h"))?;

  run_cmake_ship(&project.path, &["header", "--output", "out/version.h"])?;
  let second = std::fs::read(project.path.join("out/version.h"))?;

  assert_eq!(first, second);
  assert!(!String::from_utf8_lossy(&first).contains("-dirty"));

  Ok(())
}

#[test]
fn test_header_honours_descriptor_build_dir() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("src/version.h.in", TEMPLATE)?;
  project.write_file(
    "release.json",
    r#"{"projectName": "demo", "githubRepo": "acme/demo", "buildDir": "out/release"}"#,
  )?;

  run_cmake_ship(&project.path, &["header"])?;
  assert!(project.file_exists("out/release/generated/version.h"));

  Ok(())
}

#[test]
fn test_header_without_template_fails() -> Result<()> {
  let project = TestProject::new()?;

  let output = cmake_ship_output(&project.path, &["header"])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("cmake/version.h.in"), "stderr: {}", stderr);
  assert!(!project.file_exists("build/generated/version.h"));

  Ok(())
}
