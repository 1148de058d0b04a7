//! Integration tests for `branchcut prepare`

use crate::helpers::{BUILD, INSTALL, TestWorkspace, git, run_branchcut, run_branchcut_raw, run_branchcut_raw_with_env};
use anyhow::Result;

#[test]
fn test_prepare_cuts_one_branch_per_package() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_branchcut(&ws.path, &["prepare"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("✅ Created release branches:"));
  assert!(stdout.contains("release-a-v1-1-0"));
  assert!(stdout.contains("release-b-v1-1-0"));

  assert_eq!(ws.branches()?, vec!["main", "release-a-v1-1-0", "release-b-v1-1-0"]);

  // Each release branch holds only its package, at the root
  for package in ["a", "b"] {
    let branch = format!("release-{}-v1-1-0", package);
    assert_eq!(
      ws.files_on(&branch)?,
      vec!["dist/index.js", "package.json", "src/index.js"]
    );
    assert!(ws.show(&branch, "package.json")?.contains(&format!("@mono/{}", package)));
    assert_eq!(ws.last_subject(&branch)?, "v1.1.0");
  }

  // Back on main with the bump committed
  assert_eq!(ws.current_branch()?, "main");
  assert_eq!(ws.last_subject("main")?, "chore: bump version to v1.1.0");
  let manifest = ws.show("main", "package.json")?;
  assert!(manifest.contains("\"version\": \"1.1.0\""));
  assert!(manifest.contains("\"workspaces\": [\n    \"packages/*\"\n  ]"));
  assert!(ws.show("main", "package-lock.json")?.contains("1.1.0"));
  assert!(!ws.staging_dir().exists());

  Ok(())
}

#[test]
fn test_prepare_twice_cuts_next_minor() -> Result<()> {
  let ws = TestWorkspace::new()?;

  run_branchcut(&ws.path, &["prepare"])?;
  run_branchcut(&ws.path, &["prepare"])?;

  assert!(ws.branches()?.contains(&"release-a-v1-2-0".to_string()));
  assert!(ws.read_file("package.json")?.contains("\"1.2.0\""));

  Ok(())
}

#[test]
fn test_prepare_takes_identity_from_environment() -> Result<()> {
  let ws = TestWorkspace::new()?;
  git(&ws.path, &["config", "--unset", "user.name"])?;
  git(&ws.path, &["config", "--unset", "user.email"])?;
  let home_dir = tempfile::TempDir::new()?;
  let home = home_dir.path().to_string_lossy().to_string();

  let output = run_branchcut_raw_with_env(
    &ws.path,
    &["prepare"],
    &[
      ("HOME", &home),
      ("XDG_CONFIG_HOME", &home),
      ("GIT_CONFIG_NOSYSTEM", "1"),
      ("GIT_AUTHOR_NAME", "Release Bot"),
      ("GIT_AUTHOR_EMAIL", "bot@example.com"),
      ("GIT_COMMITTER_NAME", "Release Bot"),
      ("GIT_COMMITTER_EMAIL", "bot@example.com"),
    ],
  )?;

  assert!(
    output.status.success(),
    "prepare failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  for branch in ["release-a-v1-1-0", "release-b-v1-1-0", "main"] {
    let log = git(&ws.path, &["log", "-1", "--format=%an <%ae> / %cn", branch])?;
    assert_eq!(
      String::from_utf8_lossy(&log.stdout).trim(),
      "Release Bot <bot@example.com> / Release Bot"
    );
  }

  Ok(())
}

#[test]
fn test_prepare_dry_run_changes_nothing() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_branchcut(&ws.path, &["prepare", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("📋 Plan: prepare v1.1.0"));
  assert!(stdout.contains("Create branch release-a-v1-1-0"));
  assert!(stdout.contains("Commit \"chore: bump version to v1.1.0\""));
  assert!(stdout.contains("Dry-run mode"));

  assert_eq!(ws.branches()?, vec!["main"]);
  assert!(ws.read_file("package.json")?.contains("\"1.0.0\""));
  assert!(!ws.path.join("packages/a/dist").exists());

  Ok(())
}

#[test]
fn test_prepare_dry_run_json() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_branchcut(&ws.path, &["prepare", "--dry-run", "--json"])?;
  let plan: serde_json::Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(plan["metadata"]["operation_type"], "prepare");
  assert_eq!(plan["metadata"]["version"], "1.1.0");
  assert_eq!(plan["metadata"]["is_destructive"], true);
  let commits = plan["operations"]
    .as_array()
    .map(|ops| ops.iter().filter(|op| op["type"] == "create_commit").count())
    .unwrap_or(0);
  assert_eq!(commits, 3);

  Ok(())
}

#[test]
fn test_build_failure_rolls_back() -> Result<()> {
  let ws = TestWorkspace::with_tools(r#"["false"]"#, INSTALL)?;

  let output = run_branchcut_raw(&ws.path, &["prepare"])?;

  assert_eq!(output.status.code(), Some(2));
  assert_eq!(ws.branches()?, vec!["main"]);
  assert_eq!(ws.current_branch()?, "main");
  assert!(!ws.staging_dir().exists());

  Ok(())
}

#[test]
fn test_install_failure_rolls_back_everything() -> Result<()> {
  let ws = TestWorkspace::with_tools(BUILD, r#"["false"]"#)?;

  let output = run_branchcut_raw(&ws.path, &["prepare"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(2));
  assert!(stderr.contains("Rolling back"));
  assert_eq!(ws.branches()?, vec!["main"]);
  assert_eq!(ws.current_branch()?, "main");
  assert!(ws.read_file("package.json")?.contains("\"1.0.0\""));
  assert!(ws.path.join("packages/a/src/index.js").exists());
  assert!(!ws.staging_dir().exists());

  Ok(())
}

#[test]
fn test_no_rollback_leaves_branches() -> Result<()> {
  let ws = TestWorkspace::with_tools(BUILD, r#"["false"]"#)?;

  let output = run_branchcut_raw(&ws.path, &["prepare", "--no-rollback"])?;

  assert_eq!(output.status.code(), Some(2));
  let branches = ws.branches()?;
  assert!(branches.contains(&"release-a-v1-1-0".to_string()));
  assert!(branches.iter().any(|b| b.starts_with("release-temp-")));

  Ok(())
}

#[test]
fn test_dirty_tree_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("README.md", "# changed\n")?;

  let output = run_branchcut_raw(&ws.path, &["prepare"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr.contains("README.md"));
  assert_eq!(ws.branches()?, vec!["main"]);

  Ok(())
}

#[test]
fn test_malformed_version_is_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("package.json", "{\n  \"version\": \"1.0\"\n}\n")?;
  ws.commit("Break version")?;

  let output = run_branchcut_raw(&ws.path, &["prepare"])?;

  assert_eq!(output.status.code(), Some(1));
  assert_eq!(ws.branches()?, vec!["main"]);

  Ok(())
}
