pub mod system_git;
mod system_git_ops;

use crate::core::error::CutResult;
use std::path::Path;

pub use system_git::SystemGit;

/// VCS abstraction for the operations the release flows need
///
/// `SystemGit` is the production backend. The flows only ever talk to this
/// trait, so tests drive them against an in-memory fake.
pub trait Vcs {
  /// Name of the checked-out branch, or "HEAD" when detached
  fn current_branch(&self) -> CutResult<String>;

  /// Short names of all local branches
  fn local_branches(&self) -> CutResult<Vec<String>>;

  /// Tracked files with uncommitted changes (staged or not)
  fn modified_tracked_files(&self) -> CutResult<Vec<String>>;

  /// Create a branch at HEAD without switching to it
  fn create_branch(&self, name: &str) -> CutResult<()>;

  /// Create a branch at HEAD and switch to it, keeping the working tree
  fn create_and_checkout_branch(&self, name: &str) -> CutResult<()>;

  /// Switch to an existing branch
  fn checkout_branch(&self, name: &str) -> CutResult<()>;

  /// Switch to a branch, discarding local changes to tracked files
  fn force_checkout_branch(&self, name: &str) -> CutResult<()>;

  /// Delete a branch even if it is not merged
  fn delete_branch(&self, name: &str) -> CutResult<()>;

  /// Stage every change in the working tree, including deletions
  fn stage_all(&self) -> CutResult<()>;

  /// Stage specific paths (relative to the repository root)
  fn stage_paths(&self, paths: &[&Path]) -> CutResult<()>;

  /// Commit the index
  fn commit(&self, message: &str) -> CutResult<()>;

  /// Push a branch to a remote
  fn push_branch(&self, remote: &str, branch: &str) -> CutResult<()>;
}
