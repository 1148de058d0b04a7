//! Read-only view of where the repository stands between releases

use crate::core::context::ReleaseLayout;
use crate::core::error::CutResult;
use crate::core::vcs::Vcs;
use crate::core::worktree::WorkTree;
use crate::release::manifest;
use crate::release::naming::release_branch_name;
use crate::release::packages::discover_packages;
use crate::release::version::Version;
use serde::Serialize;
use std::collections::HashSet;

/// Release branches of one package
#[derive(Debug, Clone, Serialize)]
pub struct PackageStatus {
  pub name: String,

  /// Branch for the current version; what `distribute` would push
  pub branch: String,

  /// Whether `branch` exists locally
  pub released: bool,

  /// Branch the next `prepare` would create
  pub next_branch: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseStatus {
  pub version: Version,
  pub next_version: Version,
  pub current_branch: String,
  pub dirty_files: Vec<String>,
  pub packages: Vec<PackageStatus>,
  /// Temporary branches left behind by an interrupted prepare
  pub leftover_temp_branches: Vec<String>,
  /// Staging directory left behind by an interrupted prepare
  pub staging_present: bool,
}

impl ReleaseStatus {
  pub fn collect(vcs: &dyn Vcs, fs: &dyn WorkTree, layout: &ReleaseLayout) -> CutResult<Self> {
    let version = manifest::read_version(fs, &layout.manifest)?;
    let next_version = version.bumped()?;
    let packages = discover_packages(fs, &layout.packages)?;
    let local = vcs.local_branches()?;
    let local_set: HashSet<&str> = local.iter().map(String::as_str).collect();

    let packages = packages
      .into_iter()
      .map(|name| {
        let branch = release_branch_name(&name, &version);
        PackageStatus {
          released: local_set.contains(branch.as_str()),
          next_branch: release_branch_name(&name, &next_version),
          branch,
          name,
        }
      })
      .collect();

    let leftover_temp_branches = local
      .iter()
      .filter(|branch| branch.starts_with("release-temp-"))
      .cloned()
      .collect();

    Ok(Self {
      version,
      next_version,
      current_branch: vcs.current_branch()?,
      dirty_files: vcs.modified_tracked_files()?,
      packages,
      leftover_temp_branches,
      staging_present: fs.exists(&layout.staging),
    })
  }

  /// Interrupted-run leftovers that would get in the way of the next prepare
  pub fn has_leftovers(&self) -> bool {
    self.staging_present || !self.leftover_temp_branches.is_empty()
  }
}
