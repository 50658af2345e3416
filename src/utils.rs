//! Utility functions for cross-platform path handling and file writes

use crate::core::error::{ShipResult, ResultExt};
use std::fs;
use std::path::Path;

/// Convert a path to forward-slash form
///
/// Git pathspecs and zip entry names both expect forward slashes, even on
/// Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Write `contents` to `path` through a sibling temp file and a rename
///
/// Readers never observe a half-written register file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> ShipResult<()> {
  let file_name = path
    .file_name()
    .map(|n| n.to_string_lossy().to_string())
    .unwrap_or_else(|| "file".to_string());
  let tmp = path.with_file_name(format!(".{}.tmp", file_name));

  fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
  if let Err(e) = fs::rename(&tmp, path) {
    let _ = fs::remove_file(&tmp);
    return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
  }
  Ok(())
}

/// Platform tag used in archive names, e.g. `linux-x64`, `windows-arm64`
pub fn platform_tag() -> String {
  let os = match std::env::consts::OS {
    "macos" => "macos",
    "windows" => "windows",
    other => other,
  };
  let arch = match std::env::consts::ARCH {
    "x86_64" => "x64",
    "x86" => "x86",
    "aarch64" => "arm64",
    other => other,
  };
  format!("{}-{}", os, arch)
}
