//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars

use linya::{Bar, Progress};
use std::io::IsTerminal;

/// Progress bar for writing archive entries
pub struct FileProgress {
  progress: Progress,
  bar: Bar,
}

impl FileProgress {
  /// Create a new progress bar for archive entries
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Only draw when stderr is an interactive terminal and there is work to show
  pub fn maybe(total: usize, label: impl Into<String>) -> Option<Self> {
    if total > 0 && std::io::stderr().is_terminal() {
      Some(Self::new(total, label))
    } else {
      None
    }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
