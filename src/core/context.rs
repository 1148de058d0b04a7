//! Workspace context - build once in main, pass to every command
//!
//! ```text
//! main.rs:
//!   WorkspaceContext::build() -> &WorkspaceContext
//!   |
//!   v
//! commands/prepare.rs, distribute.rs, status.rs:
//!   fn run_*(ctx: &WorkspaceContext, ...)
//! ```

use crate::core::config::CutConfig;
use crate::core::error::{CutError, CutResult};
use crate::core::tools::SystemTools;
use crate::core::vcs::SystemGit;
use std::path::{Path, PathBuf};

/// Repository-level state shared by all commands
pub struct WorkspaceContext {
  /// Repository working tree root (absolute path)
  pub root: PathBuf,

  /// Loaded configuration (defaults when no file exists)
  pub config: CutConfig,

  /// Git backend opened at `root`
  pub git: SystemGit,
}

impl WorkspaceContext {
  /// Build the context from any directory inside the repository
  pub fn build(start_dir: &Path) -> CutResult<Self> {
    let git = SystemGit::open(start_dir)?;
    let root = git.work_tree().to_path_buf();
    let config = CutConfig::load(&root)?;

    Ok(Self { root, config, git })
  }

  /// Absolute paths the release flows operate on
  pub fn layout(&self) -> CutResult<ReleaseLayout> {
    ReleaseLayout::new(&self.root, &self.config)
  }

  /// Build runner and package manager, as configured
  pub fn tools(&self) -> SystemTools {
    SystemTools::new(self.root.clone(), &self.config.tools)
  }
}

/// Absolute paths of everything the flows touch
#[derive(Debug, Clone)]
pub struct ReleaseLayout {
  /// Repository root; wiped on every release branch
  pub root: PathBuf,
  pub manifest: PathBuf,
  pub lockfile: PathBuf,
  pub packages: PathBuf,
  /// External staging directory, a sibling of `root`
  pub staging: PathBuf,
}

impl ReleaseLayout {
  pub fn new(root: &Path, config: &CutConfig) -> CutResult<Self> {
    let parent = root.parent().ok_or_else(|| {
      CutError::with_help(
        format!("Repository root {} has no parent directory for staging", root.display()),
        "Move the checkout below the filesystem root.",
      )
    })?;

    Ok(Self {
      root: root.to_path_buf(),
      manifest: root.join(&config.workspace.manifest),
      lockfile: root.join(&config.workspace.lockfile),
      packages: root.join(&config.workspace.packages),
      staging: parent.join(&config.staging.dir_name),
    })
  }

  /// Path of a package's copy in the staging area
  pub fn staged_package(&self, package: &str) -> PathBuf {
    self.staging.join(package)
  }

  /// Path relative to the repository root, for git and for display
  pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
    path.strip_prefix(&self.root).unwrap_or(path)
  }
}
