//! Prepare: cut one isolated release branch per package
//!
//! ```text
//! original ──► release-temp-<ts> ──► build ──► release-<pkg>-v<x-y-z> (per package)
//!                                        │
//!                                        └─► copy packages/<pkg> to staging
//!
//! per package:  checkout release branch ─► wipe root ─► move staged copy in ─► commit v<x.y.z>
//!
//! original ──► bump manifest ─► install ─► commit "chore: bump version to v<x.y.z>"
//!          ──► remove staging, delete temp branch
//! ```
//!
//! All side effects go through the `Vcs`, `WorkTree` and `Toolchain` handles,
//! and every forward step records its compensation on the `ReleaseSession`.

use crate::core::context::ReleaseLayout;
use crate::core::error::{CutError, CutResult, ResultExt, ValidationError};
use crate::core::plan::{Operation, OperationType, Plan};
use crate::core::tools::Toolchain;
use crate::core::vcs::Vcs;
use crate::core::worktree::WorkTree;
use crate::release::manifest;
use crate::release::naming::{bump_commit_message, release_branch_name, release_commit_message, temp_branch_name};
use crate::release::packages::discover_packages;
use crate::release::session::{Compensation, ReleaseSession, StagingEntry};
use crate::release::version::Version;
use crate::ui::progress::FileProgress;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Entries of the repository root that survive the wipe on a release branch
const KEEP_IN_ROOT: &[&str] = &[".git"];

/// Options for a prepare run
#[derive(Debug, Clone)]
pub struct PrepareOptions {
  /// Unwind completed steps when a later one fails
  pub rollback: bool,
}

impl Default for PrepareOptions {
  fn default() -> Self {
    Self { rollback: true }
  }
}

/// Outcome of a successful prepare run
#[derive(Debug, Clone, Serialize)]
pub struct PrepareReport {
  pub previous_version: Version,
  pub version: Version,
  pub original_branch: String,
  pub temp_branch: String,
  /// Release branches, in package order
  pub branches: Vec<String>,
}

/// Drives the prepare flow over injected capabilities
pub struct Preparer<'a> {
  vcs: &'a dyn Vcs,
  fs: &'a dyn WorkTree,
  tools: &'a dyn Toolchain,
  layout: &'a ReleaseLayout,
  started_at: DateTime<Utc>,
}

impl<'a> Preparer<'a> {
  pub fn new(vcs: &'a dyn Vcs, fs: &'a dyn WorkTree, tools: &'a dyn Toolchain, layout: &'a ReleaseLayout) -> Self {
    Self {
      vcs,
      fs,
      tools,
      layout,
      started_at: Utc::now(),
    }
  }

  /// Pin the timestamp the temporary branch is named after
  #[cfg(test)]
  pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
    self.started_at = at;
    self
  }

  /// Everything `run` would do, without doing it
  pub fn plan(&self) -> CutResult<Plan> {
    let current = manifest::read_version(self.fs, &self.layout.manifest)?;
    let version = current.bumped()?;
    let packages = discover_packages(self.fs, &self.layout.packages)?;
    let original = self.vcs.current_branch()?;
    let temp = temp_branch_name(self.started_at);

    let manifest_path = self.display(&self.layout.manifest);
    let lockfile_path = self.display(&self.layout.lockfile);
    let root = ".".to_string();

    let mut plan = Plan::new(OperationType::Prepare, version.to_string());
    plan.add_operation(Operation::CreateBranch {
      name: temp.clone(),
      from: original.clone(),
    });
    plan.add_operation(Operation::Checkout { branch: temp.clone() });
    plan.add_operation(Operation::RunTool {
      tool: "build".to_string(),
      command: self.tools.build_command(),
    });

    for package in &packages {
      plan.add_operation(Operation::CreateBranch {
        name: release_branch_name(package, &version),
        from: temp.clone(),
      });
    }
    for package in &packages {
      plan.add_operation(Operation::Copy {
        from: self.display(&self.layout.packages.join(package)),
        to: self.layout.staged_package(package).display().to_string(),
      });
    }
    for package in &packages {
      plan.add_operation(Operation::Checkout {
        branch: release_branch_name(package, &version),
      });
      plan.add_operation(Operation::Clear {
        path: root.clone(),
        keep: KEEP_IN_ROOT.iter().map(|s| s.to_string()).collect(),
      });
      plan.add_operation(Operation::Move {
        from: self.layout.staged_package(package).display().to_string(),
        to: root.clone(),
      });
      plan.add_operation(Operation::CreateCommit {
        message: release_commit_message(&version),
        files: Vec::new(),
      });
    }

    plan.add_operation(Operation::Checkout {
      branch: original.clone(),
    });
    plan.add_operation(Operation::UpdateVersion {
      path: manifest_path.clone(),
      version: version.to_string(),
    });
    plan.add_operation(Operation::RunTool {
      tool: "install".to_string(),
      command: self.tools.install_command(),
    });
    plan.add_operation(Operation::CreateCommit {
      message: bump_commit_message(&version),
      files: vec![manifest_path, lockfile_path],
    });
    plan.add_operation(Operation::RemoveDir {
      path: self.layout.staging.display().to_string(),
    });
    plan.add_operation(Operation::DeleteBranch { name: temp });

    let summary = format!(
      "{} → {} on {}: {} release branch(es)",
      current,
      version,
      original,
      packages.len()
    );
    let plan = plan.with_summary(summary);
    Ok(if packages.is_empty() { plan } else { plan.mark_destructive() })
  }

  /// Run the flow
  ///
  /// On failure with `options.rollback`, completed steps are undone before
  /// the original error is returned.
  pub fn run(&self, options: &PrepareOptions) -> CutResult<PrepareReport> {
    let previous = manifest::read_version(self.fs, &self.layout.manifest)?;
    let version = previous.bumped()?;
    let packages = discover_packages(self.fs, &self.layout.packages)?;
    let original = self.preflight()?;

    println!("🚀 Preparing release v{} (from v{} on {})", version, previous, original);
    if packages.is_empty() {
      println!("   No packages found in {}", self.display(&self.layout.packages));
    }

    let mut session = ReleaseSession::new(original, version);
    match self.execute(&mut session, &packages) {
      Ok(()) => Ok(PrepareReport {
        previous_version: previous,
        version,
        original_branch: session.original_branch.clone(),
        temp_branch: session.temp_branch.clone().unwrap_or_default(),
        branches: session.committed_branches.clone(),
      }),
      Err(err) => {
        if options.rollback {
          session.rollback(self.vcs, self.fs);
        } else if !session.compensations().is_empty() {
          eprintln!("⚠️  Rollback disabled; the repository was left as is");
          if !session.created_branches.is_empty() {
            eprintln!("   Release branches created: {}", session.created_branches.join(", "));
          }
          eprintln!("   Pending cleanup:");
          for compensation in session.compensations().iter().rev() {
            eprintln!("   - {}", compensation);
          }
        }
        Err(err)
      }
    }
  }

  /// The flow must return to a named branch, and forced checkouts must not
  /// eat uncommitted work
  fn preflight(&self) -> CutResult<String> {
    let branch = self.vcs.current_branch()?;
    if branch == "HEAD" {
      return Err(CutError::Validation(ValidationError::DetachedHead));
    }

    let dirty = self.vcs.modified_tracked_files()?;
    if !dirty.is_empty() {
      return Err(CutError::Validation(ValidationError::DirtyWorkTree { files: dirty }));
    }

    Ok(branch)
  }

  fn execute(&self, session: &mut ReleaseSession, packages: &[String]) -> CutResult<()> {
    if self.fs.exists(&self.layout.staging) {
      eprintln!(
        "⚠️  Removing stale staging directory {} from an earlier run",
        self.layout.staging.display()
      );
      self.fs.remove_dir_all(&self.layout.staging)?;
    }

    let temp = temp_branch_name(self.started_at);
    println!("🌿 Creating temporary branch {}", temp);
    self.vcs.create_and_checkout_branch(&temp)?;
    session.temp_branch = Some(temp.clone());
    session.push_compensation(Compensation::DeleteBranch { branch: temp.clone() });
    session.push_compensation(Compensation::ForceCheckout {
      branch: session.original_branch.clone(),
    });

    println!("🔨 Building packages ({})", self.tools.build_command());
    self.tools.build()?;

    self.create_release_branches(session, packages)?;
    self.stage_packages(session, packages)?;
    self.isolate_packages(session)?;

    println!("🔙 Returning to {}", session.original_branch);
    self.vcs.checkout_branch(&session.original_branch)?;

    self.bump_manifest(session)?;
    session.discard_compensations();

    self.cleanup(&temp)
  }

  fn create_release_branches(&self, session: &mut ReleaseSession, packages: &[String]) -> CutResult<()> {
    for package in packages {
      let branch = release_branch_name(package, &session.version);
      self.vcs.create_branch(&branch)?;
      session.created_branches.push(branch.clone());
      session.push_compensation(Compensation::DeleteBranch { branch });
    }
    Ok(())
  }

  /// Copy every package outside the repository, where the root wipe cannot reach
  fn stage_packages(&self, session: &mut ReleaseSession, packages: &[String]) -> CutResult<()> {
    if packages.is_empty() {
      return Ok(());
    }

    println!("📦 Staging {} package(s) in {}", packages.len(), self.layout.staging.display());
    self.fs.create_dir_all(&self.layout.staging)?;
    session.push_compensation(Compensation::RemoveStaging {
      path: self.layout.staging.clone(),
    });

    let mut progress = (packages.len() > 1).then(|| FileProgress::new(packages.len(), "Staging packages"));
    for package in packages {
      let source = self.layout.packages.join(package);
      let target = self.layout.staged_package(package);
      self
        .fs
        .copy_dir(&source, &target)
        .with_context(|| format!("Failed to stage package '{}'", package))?;
      session.staged.push(StagingEntry {
        package: package.clone(),
        path: target,
      });
      if let Some(progress) = progress.as_mut() {
        progress.inc();
      }
    }
    Ok(())
  }

  fn isolate_packages(&self, session: &mut ReleaseSession) -> CutResult<()> {
    if session.staged.is_empty() {
      return Ok(());
    }

    // From here on the root may be wiped; get back to the original branch
    // before any release branch is deleted
    session.push_compensation(Compensation::ForceCheckout {
      branch: session.original_branch.clone(),
    });

    let message = release_commit_message(&session.version);
    let entries = session.staged.clone();
    for entry in &entries {
      let branch = release_branch_name(&entry.package, &session.version);
      println!("🧹 Isolating {} on {}", entry.package, branch);

      self.vcs.checkout_branch(&branch)?;
      self.fs.clear_dir_except(&self.layout.root, KEEP_IN_ROOT)?;

      if !self.fs.exists(&entry.path) {
        return Err(CutError::Validation(ValidationError::StagedContentMissing {
          package: entry.package.clone(),
          path: entry.path.clone(),
        }));
      }

      self.fs.move_dir_contents(&entry.path, &self.layout.root)?;
      self.vcs.stage_all()?;
      self.vcs.commit(&message)?;
      session.committed_branches.push(branch);
    }
    Ok(())
  }

  fn bump_manifest(&self, session: &ReleaseSession) -> CutResult<()> {
    println!(
      "🔖 Bumping {} to v{}",
      self.display(&self.layout.manifest),
      session.version
    );
    manifest::write_version(self.fs, &self.layout.manifest, &session.version)?;

    println!("📥 Refreshing lock file ({})", self.tools.install_command());
    self.tools.install()?;

    let mut paths: Vec<&Path> = vec![self.layout.relative(&self.layout.manifest)];
    if self.fs.exists(&self.layout.lockfile) {
      paths.push(self.layout.relative(&self.layout.lockfile));
    }
    self.vcs.stage_paths(&paths)?;
    self.vcs.commit(&bump_commit_message(&session.version))
  }

  fn cleanup(&self, temp: &str) -> CutResult<()> {
    println!("🗑️  Cleaning up");
    self
      .fs
      .remove_dir_all(&self.layout.staging)
      .context("Failed to remove staging directory")?;
    self
      .vcs
      .delete_branch(temp)
      .with_context(|| format!("Failed to delete temporary branch {}", temp))
  }

  fn display(&self, path: &Path) -> String {
    self.layout.relative(path).display().to_string()
  }
}
