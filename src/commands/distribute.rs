use crate::core::context::WorkspaceContext;
use crate::core::error::CutResult;
use crate::core::worktree::LocalFs;
use crate::release::Distributor;

/// Run the distribute command
pub fn run_distribute(ctx: &WorkspaceContext, remote: Option<String>, dry_run: bool, json: bool) -> CutResult<()> {
  let layout = ctx.layout()?;
  let remote = remote.unwrap_or_else(|| ctx.config.distribute.remote.clone());
  let distributor = Distributor::new(&ctx.git, &LocalFs, &layout, remote);

  if dry_run {
    let plan = distributor.plan()?;
    if json {
      println!("{}", plan.to_json()?);
    } else if plan.is_empty() {
      println!("❌ No matching release branches found to push.");
    } else {
      println!("{}", plan.to_human_readable());
      println!("🔍 Dry-run mode (nothing pushed)");
    }
    return Ok(());
  }

  let report = distributor.run()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else if !report.pushed.is_empty() {
    println!("✅ Pushed {} release branch(es) to {}", report.pushed.len(), report.remote);
  }

  Ok(())
}
