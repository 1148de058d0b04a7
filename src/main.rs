mod commands;
mod core;
mod release;
mod ui;

use clap::{Parser, Subcommand};
use core::error::{CutError, print_error};

/// Cut per-package release branches from a monorepo
#[derive(Parser)]
#[command(name = "branchcut")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Bump the minor version and cut one release branch per package
  Prepare {
    /// Show the plan without making changes
    #[arg(long)]
    dry_run: bool,
    /// Output the plan or report in JSON format
    #[arg(long)]
    json: bool,
    /// Leave the repository as is when a step fails
    #[arg(long)]
    no_rollback: bool,
  },

  /// Push the current version's release branches
  Distribute {
    /// Remote to push to (default: `[distribute] remote`, else origin)
    #[arg(long)]
    remote: Option<String>,
    /// Show the branches that would be pushed
    #[arg(long)]
    dry_run: bool,
    /// Output the plan or report in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show versions, release branches and leftovers of interrupted runs
  Status {
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
  let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
  let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .literal(anstyle::Style::new().fg_color(Some(green)))
    .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
    .error(anstyle::Style::new().bold().fg_color(Some(red)))
    .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let start_dir = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(CutError::from(e).context("Failed to get current directory")),
  };

  let ctx = match core::context::WorkspaceContext::build(&start_dir) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Prepare {
      dry_run,
      json,
      no_rollback,
    } => commands::run_prepare(&ctx, dry_run, json, no_rollback),
    Commands::Distribute { remote, dry_run, json } => commands::run_distribute(&ctx, remote, dry_run, json),
    Commands::Status { json } => commands::run_status(&ctx, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: CutError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
