//! Distribute: push the release branches of the current version

use crate::core::context::ReleaseLayout;
use crate::core::error::CutResult;
use crate::core::plan::{Operation, OperationType, Plan};
use crate::core::vcs::Vcs;
use crate::core::worktree::WorkTree;
use crate::release::manifest;
use crate::release::naming::expected_release_branches;
use crate::release::packages::discover_packages;
use crate::release::version::Version;
use serde::Serialize;
use std::collections::HashSet;

/// Expected branches that exist locally, in expected order
pub fn select_branches(expected: &[String], local: &[String]) -> Vec<String> {
  let local: HashSet<&str> = local.iter().map(String::as_str).collect();
  expected
    .iter()
    .filter(|branch| local.contains(branch.as_str()))
    .cloned()
    .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributeReport {
  pub version: Version,
  pub remote: String,
  pub pushed: Vec<String>,
}

pub struct Distributor<'a> {
  vcs: &'a dyn Vcs,
  fs: &'a dyn WorkTree,
  layout: &'a ReleaseLayout,
  remote: String,
}

impl<'a> Distributor<'a> {
  pub fn new(vcs: &'a dyn Vcs, fs: &'a dyn WorkTree, layout: &'a ReleaseLayout, remote: impl Into<String>) -> Self {
    Self {
      vcs,
      fs,
      layout,
      remote: remote.into(),
    }
  }

  /// Current (not bumped) version and the local branches to push
  fn resolve(&self) -> CutResult<(Version, Vec<String>)> {
    let version = manifest::read_version(self.fs, &self.layout.manifest)?;
    let packages = discover_packages(self.fs, &self.layout.packages)?;
    let expected = expected_release_branches(&packages, &version);
    let local = self.vcs.local_branches()?;
    Ok((version, select_branches(&expected, &local)))
  }

  pub fn plan(&self) -> CutResult<Plan> {
    let (version, branches) = self.resolve()?;
    let mut plan = Plan::new(OperationType::Distribute, version.to_string());
    for branch in &branches {
      plan.add_operation(Operation::Push {
        remote: self.remote.clone(),
        branch: branch.clone(),
      });
    }
    Ok(plan.with_summary(format!("{} release branch(es) to {}", branches.len(), self.remote)))
  }

  pub fn run(&self) -> CutResult<DistributeReport> {
    let (version, branches) = self.resolve()?;

    if branches.is_empty() {
      println!("❌ No matching release branches found to push.");
      return Ok(DistributeReport {
        version,
        remote: self.remote.clone(),
        pushed: Vec::new(),
      });
    }

    println!("🚀 Pushing {} release branch(es) for v{} to {}", branches.len(), version, self.remote);
    let mut pushed = Vec::with_capacity(branches.len());
    for branch in branches {
      println!("   📤 {}", branch);
      self.vcs.push_branch(&self.remote, &branch)?;
      pushed.push(branch);
    }

    Ok(DistributeReport {
      version,
      remote: self.remote.clone(),
      pushed,
    })
  }
}
