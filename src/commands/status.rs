use crate::core::context::WorkspaceContext;
use crate::core::error::CutResult;
use crate::core::worktree::LocalFs;
use crate::release::ReleaseStatus;

/// Run the status command
pub fn run_status(ctx: &WorkspaceContext, json: bool) -> CutResult<()> {
  let layout = ctx.layout()?;
  let status = ReleaseStatus::collect(&ctx.git, &LocalFs, &layout)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&status)?);
  } else {
    print_status_table(&status);
  }

  Ok(())
}

fn print_status_table(status: &ReleaseStatus) {
  println!("\n📊 Release Status\n");
  println!("  Version:  {} (next: {})", status.version, status.next_version);
  println!("  Branch:   {}", status.current_branch);
  if !status.dirty_files.is_empty() {
    println!("  Modified: {} tracked file(s)", status.dirty_files.len());
  }
  println!();

  if status.packages.is_empty() {
    println!("  No packages found");
  } else {
    println!("{:<20} {:<32} {:<10} NEXT", "PACKAGE", "BRANCH", "LOCAL");
    println!("{:-<90}", "");
    for package in &status.packages {
      let local = if package.released { "yes" } else { "no" };
      println!(
        "{:<20} {:<32} {:<10} {}",
        package.name, package.branch, local, package.next_branch
      );
    }
  }

  if status.has_leftovers() {
    println!();
    println!("⚠️  Leftovers from an interrupted prepare:");
    for branch in &status.leftover_temp_branches {
      println!("   - branch {}", branch);
    }
    if status.staging_present {
      println!("   - staging directory (removed by the next prepare)");
    }
  }

  println!();
}
