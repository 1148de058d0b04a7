//! Branch names and commit messages
//!
//! `release_branch_name` is the only link between prepare (which creates the
//! branches) and distribute (which has to find them again), so both go
//! through it.

use crate::release::version::Version;
use chrono::{DateTime, Utc};

/// `release-<package>-v<major>-<minor>-<patch>`
pub fn release_branch_name(package: &str, version: &Version) -> String {
  format!(
    "release-{}-v{}-{}-{}",
    package, version.major, version.minor, version.patch
  )
}

/// Release branch names for every package, in package order
pub fn expected_release_branches(packages: &[String], version: &Version) -> Vec<String> {
  packages
    .iter()
    .map(|package| release_branch_name(package, version))
    .collect()
}

/// `release-temp-YYYYMMDDHHMMSS` (UTC)
pub fn temp_branch_name(now: DateTime<Utc>) -> String {
  format!("release-temp-{}", now.format("%Y%m%d%H%M%S"))
}

/// Commit message of a package's isolated snapshot
pub fn release_commit_message(version: &Version) -> String {
  format!("v{}", version)
}

/// Commit message of the manifest bump on the original branch
pub fn bump_commit_message(version: &Version) -> String {
  format!("chore: bump version to v{}", version)
}
