//! `cmake-ship init`
//!
//! Bootstraps a CMake project: presets, header template, release descriptor,
//! build counter, ignore rules and the CMake module that regenerates the
//! version header at configure time. Existing files are never overwritten.

use crate::core::config::{BUILD_COUNTER_FILE, DESCRIPTOR_FILE, ProjectDescriptor, VERSION_SOURCE_FILE};
use crate::core::error::{ResultExt, ShipResult};
use crate::core::registers::VersionDeclaration;
use crate::header::DEFAULT_TEMPLATE;
use std::fs;
use std::path::Path;
use tracing::debug;

const PRESETS_FILE: &str = "CMakePresets.json";
const TEMPLATE_FILE: &str = "cmake/version.h.in";
const MODULE_FILE: &str = "cmake/ShipVersion.cmake";
const GITIGNORE_FILE: &str = ".gitignore";

const GITIGNORE_LINES: [&str; 3] = ["/build/", "*.zip", ".*.tmp"];

const PRESETS: &str = r#"{
  "version": 3,
  "configurePresets": [
    {
      "name": "release",
      "displayName": "Release",
      "binaryDir": "${sourceDir}/build",
      "cacheVariables": {
        "CMAKE_BUILD_TYPE": "Release"
      }
    },
    {
      "name": "debug",
      "displayName": "Debug",
      "binaryDir": "${sourceDir}/build-debug",
      "cacheVariables": {
        "CMAKE_BUILD_TYPE": "Debug"
      }
    }
  ],
  "buildPresets": [
    { "name": "release", "configurePreset": "release", "configuration": "Release" },
    { "name": "debug", "configurePreset": "debug", "configuration": "Debug" }
  ]
}
"#;

const CMAKE_MODULE: &str = r#"# Regenerates the version header on every configure.
#
#   include(cmake/ShipVersion.cmake)
#   ship_version_header(my_target)

find_program(CMAKE_SHIP_EXECUTABLE cmake-ship REQUIRED)

function(ship_version_header target)
  execute_process(
    COMMAND "${CMAKE_SHIP_EXECUTABLE}" header --output "${CMAKE_BINARY_DIR}/generated/version.h"
    WORKING_DIRECTORY "${CMAKE_SOURCE_DIR}"
    OUTPUT_VARIABLE _ship_include_dir
    OUTPUT_STRIP_TRAILING_WHITESPACE
    RESULT_VARIABLE _ship_result
  )
  if(NOT _ship_result EQUAL 0)
    message(FATAL_ERROR "cmake-ship header failed (${_ship_result})")
  endif()
  target_include_directories(${target} PRIVATE "${_ship_include_dir}")
endfunction()
"#;

/// What happened to one bootstrap file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
  Created,
  /// Existing file extended with missing lines
  Updated,
  Skipped,
}

/// Create the bootstrap files under `root`, returning one outcome per file
pub fn init_project(root: &Path, name: Option<String>, repo: Option<String>) -> ShipResult<Vec<(String, FileOutcome)>> {
  let name = name.unwrap_or_else(|| default_project_name(root));
  let repo = repo.unwrap_or_else(|| format!("owner/{}", name));

  let mut descriptor = ProjectDescriptor::new(&name, repo);
  descriptor.executables = vec![name.clone()];
  descriptor.package_files = vec!["README.md".to_string()];
  let descriptor_json = descriptor.to_json_pretty()?;

  let files: [(&str, &str); 5] = [
    (PRESETS_FILE, PRESETS),
    (TEMPLATE_FILE, DEFAULT_TEMPLATE),
    (DESCRIPTOR_FILE, descriptor_json.as_str()),
    (BUILD_COUNTER_FILE, "0\n"),
    (MODULE_FILE, CMAKE_MODULE),
  ];

  let mut outcomes = Vec::new();
  for (relative, content) in files {
    let outcome = create_if_absent(&root.join(relative), content)?;
    outcomes.push((relative.to_string(), outcome));
  }
  outcomes.push((GITIGNORE_FILE.to_string(), extend_gitignore(&root.join(GITIGNORE_FILE))?));

  Ok(outcomes)
}

/// Run the init command and print what was done
pub fn run_init(root: &Path, name: Option<String>, repo: Option<String>) -> ShipResult<()> {
  let outcomes = init_project(root, name, repo)?;

  println!("🚀 Initializing cmake-ship in {}", root.display());
  println!();
  for (file, outcome) in &outcomes {
    match outcome {
      FileOutcome::Created => println!("  ✅ Created {}", file),
      FileOutcome::Updated => println!("  ✅ Updated {}", file),
      FileOutcome::Skipped => println!("  ⏭️  {} already exists, skipping", file),
    }
  }

  println!();
  println!("Next steps:");
  println!("  1. Edit {} (githubRepo, executables, packageFiles)", DESCRIPTOR_FILE);
  println!("  2. Add to {}:", VERSION_SOURCE_FILE);
  println!("       include({})", MODULE_FILE);
  println!("       ship_version_header(<target>)");
  println!("  3. cmake-ship release --patch");

  Ok(())
}

/// Project name from the `project()` declaration, else the directory name
fn default_project_name(root: &Path) -> String {
  if let Ok(declaration) = VersionDeclaration::new(root.join(VERSION_SOURCE_FILE)).read() {
    return declaration.project;
  }
  root
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| "project".to_string())
}

fn create_if_absent(path: &Path, content: &str) -> ShipResult<FileOutcome> {
  if path.exists() {
    debug!(path = %path.display(), "exists, leaving untouched");
    return Ok(FileOutcome::Skipped);
  }
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(FileOutcome::Created)
}

/// Append whichever ignore lines are missing
fn extend_gitignore(path: &Path) -> ShipResult<FileOutcome> {
  if !path.exists() {
    let content = GITIGNORE_LINES.iter().map(|l| format!("{}\n", l)).collect::<String>();
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    return Ok(FileOutcome::Created);
  }

  let existing = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let missing: Vec<&str> = GITIGNORE_LINES
    .iter()
    .copied()
    .filter(|line| !existing.lines().any(|l| l.trim() == *line))
    .collect();
  if missing.is_empty() {
    return Ok(FileOutcome::Skipped);
  }

  let mut content = existing;
  if !content.is_empty() && !content.ends_with('\n') {
    content.push('\n');
  }
  content.push_str("\n# cmake-ship\n");
  for line in missing {
    content.push_str(line);
    content.push('\n');
  }
  fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(FileOutcome::Updated)
}
