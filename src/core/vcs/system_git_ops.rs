//! `Vcs` implementation for SystemGit (branches, commits, pushes)

use super::Vcs;
use super::system_git::{SystemGit, parse_branch_list, parse_porcelain_paths};
use crate::core::error::{CutError, CutResult, GitError, ResultExt};
use std::path::Path;

impl Vcs for SystemGit {
  fn current_branch(&self) -> CutResult<String> {
    let args = ["symbolic-ref", "--quiet", "--short", "HEAD"];
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .context("Failed to execute git symbolic-ref")?;

    if output.status.success() {
      return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
    }
    // --quiet exits 1 without output only when HEAD is detached
    if output.status.code() == Some(1) && output.stderr.is_empty() {
      return Ok("HEAD".to_string());
    }

    Err(CutError::Git(GitError::CommandFailed {
      command: format!("git {}", args.join(" ")),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }))
  }

  fn local_branches(&self) -> CutResult<Vec<String>> {
    // --format keeps the "* " current-branch marker out of the names
    let stdout = self.capture(&["branch", "--format=%(refname:short)"])?;
    Ok(parse_branch_list(&stdout))
  }

  fn modified_tracked_files(&self) -> CutResult<Vec<String>> {
    let stdout = self.capture(&["status", "--porcelain", "--untracked-files=no"])?;
    Ok(parse_porcelain_paths(&stdout))
  }

  fn create_branch(&self, name: &str) -> CutResult<()> {
    self.capture(&["branch", name]).map(|_| ())
  }

  fn create_and_checkout_branch(&self, name: &str) -> CutResult<()> {
    self.passthrough(&["checkout", "-b", name])
  }

  fn checkout_branch(&self, name: &str) -> CutResult<()> {
    self.passthrough(&["checkout", name])
  }

  fn force_checkout_branch(&self, name: &str) -> CutResult<()> {
    self.passthrough(&["checkout", "--force", name])
  }

  fn delete_branch(&self, name: &str) -> CutResult<()> {
    self.capture(&["branch", "-D", name]).map(|_| ())
  }

  fn stage_all(&self) -> CutResult<()> {
    self.passthrough(&["add", "--all", "."])
  }

  fn stage_paths(&self, paths: &[&Path]) -> CutResult<()> {
    let paths: Vec<String> = paths.iter().map(|p| path_to_git_format(p)).collect();
    let mut args = vec!["add", "--"];
    args.extend(paths.iter().map(String::as_str));
    self.passthrough(&args)
  }

  fn commit(&self, message: &str) -> CutResult<()> {
    self.passthrough(&["commit", "-m", message])
  }

  fn push_branch(&self, remote: &str, branch: &str) -> CutResult<()> {
    self.passthrough(&["push", remote, branch]).map_err(|err| match err {
      CutError::Git(GitError::CommandFailed { .. }) => CutError::Git(GitError::PushFailed {
        remote: remote.to_string(),
        branch: branch.to_string(),
      }),
      other => other,
    })
  }
}

/// Convert a path to Git format (always forward slashes)
fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}
