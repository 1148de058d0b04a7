//! Reading and bumping the version in the shared JSON manifest

use crate::core::error::{CutResult, ManifestError, ResultExt};
use crate::core::worktree::WorkTree;
use crate::release::version::Version;
use serde_json::Value;
use std::path::Path;

/// Parse the manifest's `version` field
pub fn read_version(fs: &dyn WorkTree, path: &Path) -> CutResult<Version> {
  let content = fs.read_to_string(path)?;
  let manifest: Value =
    serde_json::from_str(&content).with_context(|| format!("Failed to parse manifest {}", path.display()))?;

  let version = manifest
    .get("version")
    .and_then(Value::as_str)
    .ok_or_else(|| ManifestError::MissingVersion {
      path: path.to_path_buf(),
    })?;

  Ok(version.parse()?)
}

/// Overwrite the manifest's `version` field, keeping every other key in place
///
/// Written back with two-space indentation.
pub fn write_version(fs: &dyn WorkTree, path: &Path, version: &Version) -> CutResult<()> {
  let content = fs.read_to_string(path)?;
  let mut manifest: Value =
    serde_json::from_str(&content).with_context(|| format!("Failed to parse manifest {}", path.display()))?;

  let object = manifest.as_object_mut().ok_or_else(|| ManifestError::NotAnObject {
    path: path.to_path_buf(),
  })?;
  object.insert("version".to_string(), Value::String(version.to_string()));

  fs.write(path, &serde_json::to_string_pretty(&manifest)?)
}
