//! State of one prepare run, and how to undo it
//!
//! Every forward step that leaves something behind pushes the action that
//! reverses it. On failure the stack unwinds newest-first, so the forced
//! checkout of the original branch always runs before the branches it was
//! standing on are deleted.

use crate::core::error::CutError;
use crate::core::vcs::Vcs;
use crate::core::worktree::WorkTree;
use crate::release::version::Version;
use std::fmt;
use std::path::PathBuf;

/// A package's copy in the external staging area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingEntry {
  pub package: String,
  pub path: PathBuf,
}

/// Reverse of a completed forward step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
  /// Return to a branch, discarding changes to tracked files
  ForceCheckout { branch: String },

  /// Delete a branch this run created
  DeleteBranch { branch: String },

  /// Remove the staging directory
  RemoveStaging { path: PathBuf },
}

impl Compensation {
  fn apply(&self, vcs: &dyn Vcs, fs: &dyn WorkTree) -> Result<(), CutError> {
    match self {
      Compensation::ForceCheckout { branch } => vcs.force_checkout_branch(branch),
      Compensation::DeleteBranch { branch } => vcs.delete_branch(branch),
      Compensation::RemoveStaging { path } => fs.remove_dir_all(path),
    }
  }
}

impl fmt::Display for Compensation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Compensation::ForceCheckout { branch } => write!(f, "checkout --force {}", branch),
      Compensation::DeleteBranch { branch } => write!(f, "delete branch {}", branch),
      Compensation::RemoveStaging { path } => write!(f, "remove {}", path.display()),
    }
  }
}

/// Explicit state of a prepare run
#[derive(Debug)]
pub struct ReleaseSession {
  /// Version being released (the bumped one)
  pub version: Version,
  /// Branch the operator started on; the run ends there
  pub original_branch: String,
  pub temp_branch: Option<String>,
  pub staged: Vec<StagingEntry>,
  /// Release branches created, in package order
  pub created_branches: Vec<String>,
  /// Release branches holding their isolated commit
  pub committed_branches: Vec<String>,
  compensations: Vec<Compensation>,
}

impl ReleaseSession {
  pub fn new(original_branch: impl Into<String>, version: Version) -> Self {
    Self {
      version,
      original_branch: original_branch.into(),
      temp_branch: None,
      staged: Vec::new(),
      created_branches: Vec::new(),
      committed_branches: Vec::new(),
      compensations: Vec::new(),
    }
  }

  pub fn push_compensation(&mut self, compensation: Compensation) {
    self.compensations.push(compensation);
  }

  /// Pending compensations, oldest first
  pub fn compensations(&self) -> &[Compensation] {
    &self.compensations
  }

  /// The run reached a state worth keeping; nothing is undone after this
  pub fn discard_compensations(&mut self) {
    self.compensations.clear();
  }

  /// Unwind every pending compensation, newest first
  ///
  /// Best-effort: a failing step is reported and the rest still run.
  /// Returns the failures.
  pub fn rollback(&mut self, vcs: &dyn Vcs, fs: &dyn WorkTree) -> Vec<(Compensation, CutError)> {
    let mut failures = Vec::new();
    if self.compensations.is_empty() {
      return failures;
    }

    eprintln!("\n↩️  Rolling back {} step(s)...", self.compensations.len());
    while let Some(compensation) = self.compensations.pop() {
      match compensation.apply(vcs, fs) {
        Ok(()) => eprintln!("   ↩️  {}", compensation),
        Err(err) => {
          eprintln!("   ⚠️  {} failed: {}", compensation, err);
          failures.push((compensation, err));
        }
      }
    }

    if failures.is_empty() {
      eprintln!("   ✅ Rolled back to {}", self.original_branch);
    } else {
      eprintln!("   ⚠️  Rollback incomplete; clean up the steps above by hand");
    }

    failures
  }
}
