//! System git backend
//!
//! Every operation shells out to the `git` binary. Commands whose output the
//! operator should watch (checkout, commit, push) inherit the terminal;
//! queries capture stdout and surface stderr on failure.

use crate::core::error::{CutError, CutResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Variables that override which repository, index or tree git acts on
const REPO_REDIRECT_VARS: &[&str] = &[
  "GIT_DIR",
  "GIT_WORK_TREE",
  "GIT_INDEX_FILE",
  "GIT_OBJECT_DIRECTORY",
  "GIT_NAMESPACE",
];

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open the git repository containing `path`
  ///
  /// This performs ONE subprocess call to find the working tree root.
  pub fn open(path: &Path) -> CutResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(CutError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(CutError::message(format!("Failed to open git repository: {}", stderr)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Run a query and return its stdout
  pub(crate) fn capture(&self, args: &[&str]) -> CutResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      return Err(CutError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }

  /// Run a command with stdout/stderr passed through to the terminal
  pub(crate) fn passthrough(&self, args: &[&str]) -> CutResult<()> {
    let status = self
      .git_cmd()
      .args(args)
      .stdin(Stdio::null())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !status.success() {
      return Err(CutError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: String::new(),
      }));
    }

    Ok(())
  }

  /// Create a git command rooted at the working tree
  ///
  /// - Sets working directory to the working tree root
  /// - Inherits the caller's environment, so identity (`GIT_AUTHOR_*`,
  ///   `GIT_COMMITTER_*`), credential helpers, signing and locale apply
  /// - Drops the variables that would point git at another repository
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_tree);

    for var in REPO_REDIRECT_VARS {
      cmd.env_remove(var);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Split `git branch --format` style output into names
///
/// Trims each line and drops blanks.
pub(crate) fn parse_branch_list(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .map(|line| line.trim().to_string())
    .filter(|line| !line.is_empty())
    .collect()
}

/// Paths from `git status --porcelain` output
pub(crate) fn parse_porcelain_paths(stdout: &str) -> Vec<String> {
  stdout
    .lines()
    .filter(|line| line.len() > 3)
    .map(|line| line[3..].to_string())
    .collect()
}
