use crate::core::context::WorkspaceContext;
use crate::core::error::CutResult;
use crate::core::worktree::LocalFs;
use crate::release::{PrepareOptions, Preparer};

/// Run the prepare command
pub fn run_prepare(ctx: &WorkspaceContext, dry_run: bool, json: bool, no_rollback: bool) -> CutResult<()> {
  let layout = ctx.layout()?;
  let tools = ctx.tools();
  let preparer = Preparer::new(&ctx.git, &LocalFs, &tools, &layout);

  if dry_run {
    let plan = preparer.plan()?;
    if json {
      println!("{}", plan.to_json()?);
    } else {
      println!("{}", plan.to_human_readable());
      println!("🔍 Dry-run mode (no changes applied)");
    }
    return Ok(());
  }

  let report = preparer.run(&PrepareOptions { rollback: !no_rollback })?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  println!();
  if report.branches.is_empty() {
    println!("✅ Version bumped to v{}; no packages to release", report.version);
  } else {
    println!("✅ Created release branches:");
    for branch in &report.branches {
      println!("   - {}", branch);
    }
  }
  println!();
  println!("Next steps:");
  println!("  branchcut distribute   # push release branches to {}", ctx.config.distribute.remote);

  Ok(())
}
