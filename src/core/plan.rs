//! Plans: the ordered operations a flow would perform
//!
//! `--dry-run` builds the same plan the flow follows and prints it instead of
//! executing it. Plans are JSON-serializable and identified by a hash of
//! their operations, so two dry runs over the same repository state print
//! the same ID.

use crate::core::error::CutResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Plan identifier (SHA256 hash of plan contents)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
  /// Create a plan ID from plan contents
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let result = hasher.finalize();
    Self(format!("{:x}", result))
  }

  /// Get the short ID (first 12 characters)
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// Operation type that can be performed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
  /// Create a branch at the current HEAD
  CreateBranch { name: String, from: String },

  /// Checkout branch
  Checkout { branch: String },

  /// Run an external tool (build runner, package manager)
  RunTool { tool: String, command: String },

  /// Copy a directory tree
  Copy { from: String, to: String },

  /// Delete everything in a directory except the listed entries
  Clear { path: String, keep: Vec<String> },

  /// Move a directory's contents into another directory
  Move { from: String, to: String },

  /// Write a new version into the manifest
  UpdateVersion { path: String, version: String },

  /// Stage files and create a commit
  CreateCommit { message: String, files: Vec<String> },

  /// Remove a directory tree
  RemoveDir { path: String },

  /// Delete a branch
  DeleteBranch { name: String },

  /// Push to remote
  Push { remote: String, branch: String },
}

/// Plan metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
  /// Plan ID (content hash)
  pub id: PlanId,

  /// What operation this plan represents
  pub operation_type: OperationType,

  /// Version the plan releases or distributes
  pub version: String,

  /// Whether this plan will make destructive changes
  pub is_destructive: bool,
}

/// Type of operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
  Prepare,
  Distribute,
}

impl fmt::Display for OperationType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OperationType::Prepare => write!(f, "prepare"),
      OperationType::Distribute => write!(f, "distribute"),
    }
  }
}

/// A plan represents a sequence of operations to perform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
  /// Plan metadata
  pub metadata: PlanMetadata,

  /// Operations to perform (in order)
  pub operations: Vec<Operation>,

  /// Human-readable summary
  pub summary: String,
}

impl Plan {
  /// Create a new plan
  pub fn new(operation_type: OperationType, version: impl Into<String>) -> Self {
    Self {
      metadata: PlanMetadata {
        id: PlanId::from_contents(&[]),
        operation_type,
        version: version.into(),
        is_destructive: false,
      },
      operations: Vec::new(),
      summary: String::new(),
    }
  }

  /// Add an operation to the plan
  pub fn add_operation(&mut self, operation: Operation) {
    self.operations.push(operation);
    self.recompute_id();
  }

  /// Set the summary
  pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
    self.summary = summary.into();
    self
  }

  /// Mark as destructive
  pub fn mark_destructive(mut self) -> Self {
    self.metadata.is_destructive = true;
    self
  }

  /// Recompute plan ID based on current contents
  fn recompute_id(&mut self) {
    let json = serde_json::to_vec(&self.operations).unwrap_or_default();
    self.metadata.id = PlanId::from_contents(&json);
  }

  /// Serialize to JSON
  pub fn to_json(&self) -> CutResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Get human-readable representation
  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!(
      "📋 Plan: {} v{} ({})\n",
      self.metadata.operation_type, self.metadata.version, self.metadata.id
    ));

    if !self.summary.is_empty() {
      output.push_str(&format!("\n{}\n", self.summary));
    }

    output.push_str(&format!("\n   Operations ({}):\n", self.len()));

    for (i, op) in self.operations.iter().enumerate() {
      output.push_str(&format!("   {}. {}\n", i + 1, operation_to_string(op)));
    }

    if self.metadata.is_destructive {
      output.push_str("\n⚠️  NOTE: This operation deletes the repository root on every release branch\n");
      output.push_str("   (Untracked files in the root, such as node_modules, are removed)\n");
    }

    output
  }

  /// Number of operations
  pub fn len(&self) -> usize {
    self.operations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }
}

/// Convert operation to human-readable string
fn operation_to_string(op: &Operation) -> String {
  match op {
    Operation::CreateBranch { name, from } => format!("Create branch {} from {}", name, from),
    Operation::Checkout { branch } => format!("Checkout branch {}", branch),
    Operation::RunTool { tool, command } => format!("Run {} ({})", tool, command),
    Operation::Copy { from, to } => format!("Copy {} → {}", from, to),
    Operation::Clear { path, keep } => format!("Clear {} (keeping {})", path, keep.join(", ")),
    Operation::Move { from, to } => format!("Move {} → {}", from, to),
    Operation::UpdateVersion { path, version } => format!("Set version {} in {}", version, path),
    Operation::CreateCommit { message, files } => {
      if files.is_empty() {
        format!("Commit \"{}\" (all changes)", message)
      } else {
        format!("Commit \"{}\" ({})", message, files.join(", "))
      }
    }
    Operation::RemoveDir { path } => format!("Remove {}", path),
    Operation::DeleteBranch { name } => format!("Delete branch {}", name),
    Operation::Push { remote, branch } => format!("Push {} to {}", branch, remote),
  }
}
