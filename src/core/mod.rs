//! Core building blocks shared by every branchcut command
//!
//! - **config**: branchcut.toml parsing and validation
//! - **context**: workspace context and the absolute release layout
//! - **error**: error types with contextual help and exit codes
//! - **plan**: dry-run plans of the operations a flow performs
//! - **tools**: build runner and package manager invocation
//! - **vcs**: git operations behind the `Vcs` trait (SystemGit)
//! - **worktree**: filesystem copy/move/delete behind the `WorkTree` trait

pub mod config;
pub mod context;
pub mod error;
pub mod plan;
pub mod tools;
pub mod vcs;
pub mod worktree;
