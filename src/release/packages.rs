use crate::core::error::{ConfigError, CutError, CutResult};
use crate::core::worktree::WorkTree;
use std::path::Path;

/// Package identifiers: the subdirectory names of `packages_dir`
///
/// Order is whatever the filesystem lists; it is not sorted. An empty
/// directory yields an empty list, which the flows treat as "nothing to do".
pub fn discover_packages(fs: &dyn WorkTree, packages_dir: &Path) -> CutResult<Vec<String>> {
  if !fs.exists(packages_dir) {
    return Err(CutError::Config(ConfigError::PackagesDirMissing {
      path: packages_dir.to_path_buf(),
    }));
  }

  fs.list_subdirs(packages_dir)
}
