//! Error types for branchcut with contextual messages and exit codes
//!
//! Every error belongs to a category that decides the process exit code, and
//! most categories carry a help line that tells the operator what to do next.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for branchcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, manifest, invalid args)
  User = 1,
  /// System error (git, build/install tools, I/O)
  System = 2,
  /// Validation failure (preflight, isolation invariant)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for branchcut
#[derive(Debug)]
pub enum CutError {
  /// Configuration errors
  Config(ConfigError),

  /// Shared manifest errors
  Manifest(ManifestError),

  /// Git operation errors
  Git(GitError),

  /// Build runner / package manager errors
  Tool(ToolError),

  /// Preflight and isolation invariant failures
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl CutError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    CutError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    CutError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  ///
  /// I/O errors are folded into a message so the path that failed is not lost.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      CutError::Message { message, context, help } => CutError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      CutError::Io(err) => CutError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      CutError::Config(_) => ExitCode::User,
      CutError::Manifest(_) => ExitCode::User,
      CutError::Git(_) => ExitCode::System,
      CutError::Tool(_) => ExitCode::System,
      CutError::Validation(_) => ExitCode::Validation,
      CutError::Io(_) => ExitCode::System,
      CutError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      CutError::Config(e) => e.help_message(),
      CutError::Manifest(e) => e.help_message(),
      CutError::Git(e) => e.help_message(),
      CutError::Tool(e) => e.help_message(),
      CutError::Validation(e) => e.help_message(),
      CutError::Message { help, .. } => help.clone(),
      CutError::Io(_) => None,
    }
  }
}

impl fmt::Display for CutError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CutError::Config(e) => write!(f, "{}", e),
      CutError::Manifest(e) => write!(f, "{}", e),
      CutError::Git(e) => write!(f, "{}", e),
      CutError::Tool(e) => write!(f, "{}", e),
      CutError::Validation(e) => write!(f, "{}", e),
      CutError::Io(e) => write!(f, "I/O error: {}", e),
      CutError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for CutError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CutError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for CutError {
  fn from(err: io::Error) -> Self {
    CutError::Io(err)
  }
}

impl From<String> for CutError {
  fn from(msg: String) -> Self {
    CutError::message(msg)
  }
}

impl From<&str> for CutError {
  fn from(msg: &str) -> Self {
    CutError::message(msg)
  }
}

impl From<toml_edit::de::Error> for CutError {
  fn from(err: toml_edit::de::Error) -> Self {
    CutError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for CutError {
  fn from(err: serde_json::Error) -> Self {
    CutError::message(format!("JSON error: {}", err))
  }
}

impl From<ManifestError> for CutError {
  fn from(err: ManifestError) -> Self {
    CutError::Manifest(err)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field holds a value branchcut cannot use
  InvalidField { field: String, reason: String },

  /// The configured packages directory does not exist
  PackagesDirMissing { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidField { field, .. } => Some(format!(
        "Fix `{}` in branchcut.toml or remove it to use the default.",
        field
      )),
      ConfigError::PackagesDirMissing { .. } => Some(
        "Set `packages` under [workspace] in branchcut.toml to the directory holding your packages.".to_string(),
      ),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config value for {}: {}", field, reason)
      }
      ConfigError::PackagesDirMissing { path } => {
        write!(f, "Packages directory not found: {}", path.display())
      }
    }
  }
}

/// Errors reading or updating the shared manifest
#[derive(Debug)]
pub enum ManifestError {
  /// The manifest has no string `version` field
  MissingVersion { path: PathBuf },

  /// The version string is not three numeric components
  InvalidVersion { value: String, reason: String },

  /// The manifest is not a JSON object
  NotAnObject { path: PathBuf },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::MissingVersion { .. } => {
        Some("Add a \"version\": \"MAJOR.MINOR.PATCH\" field to the root manifest.".to_string())
      }
      ManifestError::InvalidVersion { .. } => {
        Some("Versions must look like 1.4.0: exactly three dot-separated numbers.".to_string())
      }
      ManifestError::NotAnObject { .. } => None,
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::MissingVersion { path } => {
        write!(f, "No \"version\" string in manifest: {}", path.display())
      }
      ManifestError::InvalidVersion { value, reason } => {
        write!(f, "Invalid version '{}': {}", value, reason)
      }
      ManifestError::NotAnObject { path } => {
        write!(f, "Manifest is not a JSON object: {}", path.display())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed { remote: String, branch: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { remote, .. } => Some(format!(
        "Check that remote '{}' exists and that you can push to it (`git remote -v`).",
        remote
      )),
      GitError::RepoNotFound { path } => Some(format!(
        "Run branchcut from inside the monorepo checkout (looked in {}).",
        path.display()
      )),
      GitError::CommandFailed { command, .. } if command.starts_with("git branch ") => {
        Some("A release branch for this version may already exist. Delete it or bump the version first.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}", command)?;
        if !stderr.trim().is_empty() {
          write!(f, "\n{}", stderr.trim_end())?;
        }
        Ok(())
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, branch } => {
        write!(f, "Push of {} to {} failed", branch, remote)
      }
    }
  }
}

/// Build runner and package manager errors
#[derive(Debug)]
pub enum ToolError {
  /// The tool could not be started at all
  Spawn { command: String, reason: String },

  /// The tool ran and exited unsuccessfully
  Failed { command: String, code: Option<i32> },

  /// No command configured
  EmptyCommand { tool: String },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::Spawn { command, .. } => Some(format!(
        "Make sure `{}` is installed and on PATH, or override it under [tools] in branchcut.toml.",
        command.split_whitespace().next().unwrap_or(command)
      )),
      ToolError::Failed { .. } => Some("See the tool output above for details.".to_string()),
      ToolError::EmptyCommand { tool } => Some(format!("Set `{}` under [tools] in branchcut.toml.", tool)),
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::Spawn { command, reason } => write!(f, "Failed to run `{}`: {}", command, reason),
      ToolError::Failed { command, code } => match code {
        Some(code) => write!(f, "`{}` exited with status {}", command, code),
        None => write!(f, "`{}` was terminated by a signal", command),
      },
      ToolError::EmptyCommand { tool } => write!(f, "No {} command configured", tool),
    }
  }
}

/// Preflight and invariant failures
#[derive(Debug)]
pub enum ValidationError {
  /// HEAD is not on a named branch
  DetachedHead,

  /// Tracked files have uncommitted changes
  DirtyWorkTree { files: Vec<String> },

  /// A package's staged copy vanished before it could be moved into the root
  StagedContentMissing { package: String, path: PathBuf },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::DetachedHead => Some("Check out the branch you release from, e.g. `git checkout main`.".to_string()),
      ValidationError::DirtyWorkTree { .. } => {
        Some("Commit or stash your changes first (`git stash`), then run prepare again.".to_string())
      }
      ValidationError::StagedContentMissing { .. } => Some(
        "Something removed the staging directory mid-run. Check for other processes touching it and run prepare again."
          .to_string(),
      ),
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::DetachedHead => write!(f, "HEAD is detached; prepare must start from a named branch"),
      ValidationError::DirtyWorkTree { files } => {
        write!(f, "Working tree has uncommitted changes to tracked files:")?;
        for file in files {
          write!(f, "\n  {}", file)?;
        }
        Ok(())
      }
      ValidationError::StagedContentMissing { package, path } => {
        write!(f, "Isolated content missing for '{}': {}", package, path.display())
      }
    }
  }
}

/// Result type alias for branchcut
pub type CutResult<T> = Result<T, CutError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> CutResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> CutResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<CutError>,
{
  fn context(self, ctx: impl Into<String>) -> CutResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> CutResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &CutError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
