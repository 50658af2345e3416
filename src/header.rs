//! Version header generation
//!
//! Templates use CMake `configure_file(... @ONLY)` placeholder syntax, so the
//! same `version.h.in` works with either tool.

use crate::core::config::HEADER_TEMPLATE_CANDIDATES;
use crate::core::error::{ConfigError, ResultExt, ShipError, ShipResult};
use crate::core::resolver::ResolvedVersion;
use crate::utils::write_atomic;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Template written by `init`
pub const DEFAULT_TEMPLATE: &str = r#"// Generated from version.h.in by cmake-ship. Do not edit.
#ifndef SHIP_VERSION_H
#define SHIP_VERSION_H

#include <stdio.h>

#define PROJECT_NAME "@PROJECT_NAME@"

#define VERSION_MAJOR @VERSION_MAJOR@
#define VERSION_MINOR @VERSION_MINOR@
#define VERSION_PATCH @VERSION_PATCH@
#define VERSION_STRING "@VERSION_STRING@"

#define VERSION_FULL "@VERSION_FULL@"
#define VERSION_BUILD @VERSION_BUILD@
#define VERSION_COMMIT "@GIT_COMMIT@"
#define VERSION_DIRTY @GIT_DIRTY@

static inline void print_version(const char *program)
{
    printf("%s v%s (built %s %s)\n", program, VERSION_FULL, __DATE__, __TIME__);
}

#endif /* SHIP_VERSION_H */
"#;

fn placeholder_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"@([A-Za-z_][A-Za-z0-9_]*)@").expect("placeholder pattern is valid"))
}

/// A located header template
#[derive(Debug, Clone)]
pub struct HeaderTemplate {
  pub path: PathBuf,
  pub content: String,
}

impl HeaderTemplate {
  /// First existing candidate under `root`
  pub fn locate(root: &Path) -> ShipResult<Self> {
    let searched: Vec<PathBuf> = HEADER_TEMPLATE_CANDIDATES.iter().map(|c| root.join(c)).collect();

    let path = searched
      .iter()
      .find(|p| p.is_file())
      .cloned()
      .ok_or_else(|| ShipError::Config(ConfigError::TemplateNotFound { searched: searched.clone() }))?;

    debug!(path = %path.display(), "using header template");
    let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Self { path, content })
  }

  pub fn render(&self, resolved: &ResolvedVersion) -> String {
    render(&self.content, resolved)
  }
}

fn placeholder_value(name: &str, resolved: &ResolvedVersion) -> Option<String> {
  let value = match name {
    "PROJECT_NAME" => resolved.project.clone(),
    "VERSION_MAJOR" => resolved.major.to_string(),
    "VERSION_MINOR" => resolved.minor.to_string(),
    "VERSION_PATCH" => resolved.patch.to_string(),
    "VERSION_BUILD" => resolved.build.to_string(),
    "VERSION_STRING" => resolved.full.triple(),
    "VERSION_FULL" => resolved.full.to_string(),
    "GIT_COMMIT" => resolved.commit.clone(),
    "GIT_DIRTY" => u8::from(resolved.dirty).to_string(),
    _ => return None,
  };
  Some(value)
}

/// Substitute known `@NAME@` placeholders; unknown ones are kept verbatim
pub fn render(template: &str, resolved: &ResolvedVersion) -> String {
  placeholder_regex()
    .replace_all(template, |caps: &Captures<'_>| {
      placeholder_value(&caps[1], resolved).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Render the project's template to `output`, replacing any previous header
///
/// Returns the include directory, the parent of `output`.
pub fn generate_header(root: &Path, output: &Path, resolved: &ResolvedVersion) -> ShipResult<PathBuf> {
  let template = HeaderTemplate::locate(root)?;
  let rendered = template.render(resolved);

  let include_dir = output
    .parent()
    .map(Path::to_path_buf)
    .ok_or_else(|| ShipError::message(format!("Invalid header path {}", output.display())))?;
  fs::create_dir_all(&include_dir).with_context(|| format!("Failed to create {}", include_dir.display()))?;
  write_atomic(output, rendered.as_bytes())?;

  info!(path = %output.display(), version = %resolved.full, "header generated");
  Ok(include_dir)
}
