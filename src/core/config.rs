use crate::core::error::{ConfigError, CutError, CutResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Configuration for branchcut
/// Searched in order: branchcut.toml, .branchcut.toml, .config/branchcut.toml
///
/// Every section is optional; a repository with no config file gets the
/// npm + turbo defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CutConfig {
  #[serde(default)]
  pub workspace: WorkspaceConfig,
  #[serde(default)]
  pub staging: StagingConfig,
  #[serde(default)]
  pub tools: ToolsConfig,
  #[serde(default)]
  pub distribute: DistributeConfig,
}

/// Where the shared manifest and the packages live, relative to the repo root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
  /// Shared manifest carrying the version (default: package.json)
  #[serde(default = "default_manifest")]
  pub manifest: PathBuf,

  /// Lock file refreshed by the install step (default: package-lock.json)
  #[serde(default = "default_lockfile")]
  pub lockfile: PathBuf,

  /// Directory whose subdirectories are the packages (default: packages)
  #[serde(default = "default_packages")]
  pub packages: PathBuf,
}

fn default_manifest() -> PathBuf {
  PathBuf::from("package.json")
}

fn default_lockfile() -> PathBuf {
  PathBuf::from("package-lock.json")
}

fn default_packages() -> PathBuf {
  PathBuf::from("packages")
}

impl Default for WorkspaceConfig {
  fn default() -> Self {
    Self {
      manifest: default_manifest(),
      lockfile: default_lockfile(),
      packages: default_packages(),
    }
  }
}

/// External staging area, created next to the repository root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
  /// Directory name of the staging area (default: .temp-isolation)
  #[serde(default = "default_staging_dir")]
  pub dir_name: String,
}

fn default_staging_dir() -> String {
  ".temp-isolation".to_string()
}

impl Default for StagingConfig {
  fn default() -> Self {
    Self {
      dir_name: default_staging_dir(),
    }
  }
}

/// External commands, as argv vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
  /// Build every workspace package (default: turbo run build)
  #[serde(default = "default_build")]
  pub build: Vec<String>,

  /// Refresh the lock file after the manifest edit (default: npm install)
  #[serde(default = "default_install")]
  pub install: Vec<String>,
}

fn default_build() -> Vec<String> {
  vec!["turbo".to_string(), "run".to_string(), "build".to_string()]
}

fn default_install() -> Vec<String> {
  vec!["npm".to_string(), "install".to_string()]
}

impl Default for ToolsConfig {
  fn default() -> Self {
    Self {
      build: default_build(),
      install: default_install(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributeConfig {
  /// Remote release branches are pushed to (default: origin)
  #[serde(default = "default_remote")]
  pub remote: String,
}

fn default_remote() -> String {
  "origin".to_string()
}

impl Default for DistributeConfig {
  fn default() -> Self {
    Self {
      remote: default_remote(),
    }
  }
}

impl CutConfig {
  /// Find config file in search order: branchcut.toml, .branchcut.toml, .config/branchcut.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("branchcut.toml"),
      path.join(".branchcut.toml"),
      path.join(".config").join("branchcut.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the repository root, falling back to defaults when no file exists
  pub fn load(path: &Path) -> CutResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: CutConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Validate values that deserialize fine but cannot work
  pub fn validate(&self) -> CutResult<()> {
    if self.tools.build.is_empty() {
      return Err(invalid("tools.build", "command must not be empty"));
    }
    if self.tools.install.is_empty() {
      return Err(invalid("tools.install", "command must not be empty"));
    }

    // The staging dir is joined onto the repo's parent, so it has to stay a single component
    let staging = Path::new(&self.staging.dir_name);
    let mut components = staging.components();
    match (components.next(), components.next()) {
      (Some(Component::Normal(_)), None) => {}
      _ => {
        return Err(invalid(
          "staging.dir_name",
          &format!("'{}' must be a plain directory name", self.staging.dir_name),
        ));
      }
    }

    for (field, path) in [
      ("workspace.manifest", &self.workspace.manifest),
      ("workspace.lockfile", &self.workspace.lockfile),
      ("workspace.packages", &self.workspace.packages),
    ] {
      if path.is_absolute() || path.as_os_str().is_empty() {
        return Err(invalid(field, "must be a path relative to the repository root"));
      }
    }

    if self.distribute.remote.trim().is_empty() {
      return Err(invalid("distribute.remote", "remote name must not be empty"));
    }

    Ok(())
  }
}

fn invalid(field: &str, reason: &str) -> CutError {
  CutError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
