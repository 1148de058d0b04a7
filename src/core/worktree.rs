//! Filesystem operations the release flows perform on the working tree and
//! the external staging area.

use crate::core::error::{CutError, CutResult, ResultExt};
use std::fs;
use std::path::Path;

/// Copy/move/delete capability used by the prepare flow
pub trait WorkTree {
  /// Does the path exist
  fn exists(&self, path: &Path) -> bool;

  /// Names of the immediate subdirectories of `dir`, in listing order
  fn list_subdirs(&self, dir: &Path) -> CutResult<Vec<String>>;

  /// Recursive copy of `source` into `target` (created if missing)
  fn copy_dir(&self, source: &Path, target: &Path) -> CutResult<()>;

  /// Move the contents of `source` into `target`, consuming `source`
  fn move_dir_contents(&self, source: &Path, target: &Path) -> CutResult<()>;

  /// Delete every entry of `dir` whose name is not in `keep`
  fn clear_dir_except(&self, dir: &Path, keep: &[&str]) -> CutResult<()>;

  fn create_dir_all(&self, path: &Path) -> CutResult<()>;

  /// Remove a directory tree; a missing path is not an error
  fn remove_dir_all(&self, path: &Path) -> CutResult<()>;

  fn read_to_string(&self, path: &Path) -> CutResult<String>;

  fn write(&self, path: &Path, contents: &str) -> CutResult<()>;
}

/// The real filesystem
pub struct LocalFs;

impl WorkTree for LocalFs {
  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn list_subdirs(&self, dir: &Path) -> CutResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
      let entry = entry?;
      // fs::metadata follows symlinks, so a linked package directory counts
      if !fs::metadata(entry.path())?.is_dir() {
        continue;
      }
      let name = entry.file_name().into_string().map_err(|raw| {
        CutError::message(format!(
          "Package directory name is not valid UTF-8: {}",
          raw.to_string_lossy()
        ))
      })?;
      names.push(name);
    }
    Ok(names)
  }

  fn copy_dir(&self, source: &Path, target: &Path) -> CutResult<()> {
    copy_directory_recursive(source, target)
      .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))
  }

  fn move_dir_contents(&self, source: &Path, target: &Path) -> CutResult<()> {
    copy_directory_recursive(source, target)
      .with_context(|| format!("Failed to move {} into {}", source.display(), target.display()))?;
    // Copy-then-remove rather than rename: staging may sit on another filesystem
    fs::remove_dir_all(source).with_context(|| format!("Failed to remove {}", source.display()))
  }

  fn clear_dir_except(&self, dir: &Path, keep: &[&str]) -> CutResult<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
      let entry = entry?;
      let name = entry.file_name();
      if keep.iter().any(|k| name == *k) {
        continue;
      }
      let path = entry.path();
      // symlink_metadata: never follow a link out of the tree we are clearing
      let removed = if fs::symlink_metadata(&path)?.is_dir() {
        fs::remove_dir_all(&path)
      } else {
        fs::remove_file(&path)
      };
      removed.with_context(|| format!("Failed to delete {}", path.display()))?;
    }
    Ok(())
  }

  fn create_dir_all(&self, path: &Path) -> CutResult<()> {
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
  }

  fn remove_dir_all(&self, path: &Path) -> CutResult<()> {
    if !path.exists() {
      return Ok(());
    }
    fs::remove_dir_all(path).with_context(|| format!("Failed to remove {}", path.display()))
  }

  fn read_to_string(&self, path: &Path) -> CutResult<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
  }

  fn write(&self, path: &Path, contents: &str) -> CutResult<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
  }
}

/// Recursively copy a directory, merging into whatever `target` already holds
fn copy_directory_recursive(source: &Path, target: &Path) -> CutResult<()> {
  if !source.exists() {
    return Err(CutError::message(format!(
      "Source path does not exist: {}",
      source.display()
    )));
  }

  if source.is_file() {
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    return Ok(());
  }

  fs::create_dir_all(target)?;

  for entry in fs::read_dir(source)? {
    let entry = entry?;
    let source_path = entry.path();
    let target_path = target.join(entry.file_name());

    if fs::metadata(&source_path)?.is_dir() {
      copy_directory_recursive(&source_path, &target_path)?;
    } else {
      fs::copy(&source_path, &target_path)?;
    }
  }

  Ok(())
}
