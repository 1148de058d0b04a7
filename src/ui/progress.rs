//! Progress indicators for long-running operations
//!
//! Uses `linya`, which draws to stderr and leaves stdout to the status lines

use linya::{Bar, Progress};

/// Progress bar over a known number of file-tree operations
pub struct FileProgress {
  progress: Progress,
  bar: Bar,
}

impl FileProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
