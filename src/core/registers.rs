//! Persistent version registers
//!
//! The version triple lives in the build descriptor's `project()` call and the
//! build counter lives in its own plain-text file. Both are re-read on every
//! run; nothing is cached between invocations.

use crate::core::error::{ConfigError, ShipError, ShipResult, ResultExt};
use crate::utils::write_atomic;
use regex::Regex;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

fn declaration_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    // CMake command names are case-insensitive, keywords are not
    Regex::new(r"\b(?i:project)\s*\(\s*([^\s)]+)[^)]*?\bVERSION\s+(\d+)\.(\d+)\.(\d+)")
      .expect("version declaration pattern is valid")
  })
}

/// A parsed `project(<name> ... VERSION x.y.z ...)` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
  pub project: String,
  pub version: semver::Version,
  /// Byte range of `x.y.z` in the source text
  span: Range<usize>,
}

impl Declaration {
  /// Find the first declaration in `content` outside a `#` comment line
  pub fn find(content: &str) -> Option<Self> {
    let caps = declaration_regex()
      .captures_iter(content)
      .find(|caps| caps.get(0).is_some_and(|m| !is_commented(content, m.start())))?;
    let major = caps.get(2)?;
    let minor = caps.get(3)?;
    let patch = caps.get(4)?;

    Some(Self {
      project: caps.get(1)?.as_str().to_string(),
      version: semver::Version::new(
        major.as_str().parse().ok()?,
        minor.as_str().parse().ok()?,
        patch.as_str().parse().ok()?,
      ),
      span: major.start()..patch.end(),
    })
  }

  /// Rewrite the version digits in place, leaving everything else untouched
  pub fn rewrite(&self, content: &str, version: &semver::Version) -> String {
    let mut out = String::with_capacity(content.len() + 4);
    out.push_str(&content[..self.span.start]);
    out.push_str(&format!("{}.{}.{}", version.major, version.minor, version.patch));
    out.push_str(&content[self.span.end..]);
    out
  }
}

/// Whether the line holding `offset` starts with `#`
fn is_commented(content: &str, offset: usize) -> bool {
  let line_start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
  content[line_start..offset].trim_start().starts_with('#')
}

/// Version triple register backed by the build descriptor
#[derive(Debug, Clone)]
pub struct VersionDeclaration {
  path: PathBuf,
}

impl VersionDeclaration {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn not_found(&self) -> ShipError {
    ShipError::Config(ConfigError::VersionNotFound {
      path: self.path.clone(),
    })
  }

  /// Raw descriptor content
  pub fn source(&self) -> ShipResult<String> {
    match fs::read_to_string(&self.path) {
      Ok(content) => Ok(content),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Err(self.not_found()),
      Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
    }
  }

  /// Read the current declaration
  pub fn read(&self) -> ShipResult<Declaration> {
    let content = self.source()?;
    Declaration::find(&content).ok_or_else(|| self.not_found())
  }

  /// Compute the rewritten descriptor without touching disk
  pub fn render(&self, version: &semver::Version) -> ShipResult<String> {
    let content = self.source()?;
    let declaration = Declaration::find(&content).ok_or_else(|| self.not_found())?;
    Ok(declaration.rewrite(&content, version))
  }

  /// Persist content produced by `render`
  pub fn store(&self, rendered: &str) -> ShipResult<()> {
    write_atomic(&self.path, rendered.as_bytes())
  }
}

/// How the counter value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterState {
  Present,
  /// File was absent; reads as `0`
  Created,
  /// File held something other than a non-negative integer; reads as `0`
  Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterReading {
  pub value: u64,
  pub state: CounterState,
}

/// Build counter register backed by a one-line text file
#[derive(Debug, Clone)]
pub struct BuildCounter {
  path: PathBuf,
}

impl BuildCounter {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the counter without touching the file
  pub fn peek(&self) -> ShipResult<CounterReading> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Ok(CounterReading {
          value: 0,
          state: CounterState::Created,
        });
      }
      Err(e) => return Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
    };

    match content.trim().parse::<u64>() {
      Ok(value) => Ok(CounterReading {
        value,
        state: CounterState::Present,
      }),
      Err(_) => {
        warn!(
          path = %self.path.display(),
          content = %content.trim(),
          "build counter is not a non-negative integer, treating as 0"
        );
        Ok(CounterReading {
          value: 0,
          state: CounterState::Reset,
        })
      }
    }
  }

  /// Read the counter, creating or normalising the file as needed
  pub fn load(&self) -> ShipResult<CounterReading> {
    let reading = self.peek()?;
    if reading.state != CounterState::Present {
      debug!(path = %self.path.display(), state = ?reading.state, "writing build counter 0");
      self.store(0)?;
    }
    Ok(reading)
  }

  pub fn store(&self, value: u64) -> ShipResult<()> {
    write_atomic(&self.path, format!("{}\n", value).as_bytes())
  }
}
