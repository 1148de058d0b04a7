//! CLI commands for branchcut
//!
//! - **prepare**: cut per-package release branches and bump the version
//! - **distribute**: push the current version's release branches
//! - **status**: show versions, release branches and leftovers
//!
//! All commands accept `&WorkspaceContext` to avoid redundant workspace loads.

pub mod distribute;
pub mod prepare;
pub mod status;

pub use distribute::run_distribute;
pub use prepare::run_prepare;
pub use status::run_status;
