//! External build runner and package manager

use crate::core::config::ToolsConfig;
use crate::core::error::{CutError, CutResult, ToolError};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// The two non-git tools the prepare flow drives
pub trait Toolchain {
  /// Build every package in the workspace
  fn build(&self) -> CutResult<()>;

  /// Refresh the lock file after a manifest edit
  fn install(&self) -> CutResult<()>;

  /// Human-readable build command (for plans and progress lines)
  fn build_command(&self) -> String;

  /// Human-readable install command
  fn install_command(&self) -> String;
}

/// Runs the configured commands in the repository root, output passed through
pub struct SystemTools {
  root: PathBuf,
  build: Vec<String>,
  install: Vec<String>,
}

impl SystemTools {
  pub fn new(root: PathBuf, config: &ToolsConfig) -> Self {
    Self {
      root,
      build: config.build.clone(),
      install: config.install.clone(),
    }
  }

  fn run(&self, tool: &str, argv: &[String]) -> CutResult<()> {
    let (program, args) = argv.split_first().ok_or_else(|| {
      CutError::Tool(ToolError::EmptyCommand {
        tool: tool.to_string(),
      })
    })?;

    let status = Command::new(program)
      .args(args)
      .current_dir(&self.root)
      .stdin(Stdio::null())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .map_err(|e| {
        CutError::Tool(ToolError::Spawn {
          command: argv.join(" "),
          reason: e.to_string(),
        })
      })?;

    if !status.success() {
      return Err(CutError::Tool(ToolError::Failed {
        command: argv.join(" "),
        code: status.code(),
      }));
    }

    Ok(())
  }
}

impl Toolchain for SystemTools {
  fn build(&self) -> CutResult<()> {
    self.run("build", &self.build)
  }

  fn install(&self) -> CutResult<()> {
    self.run("install", &self.install)
  }

  fn build_command(&self) -> String {
    self.build.join(" ")
  }

  fn install_command(&self) -> String {
    self.install.join(" ")
  }
}
