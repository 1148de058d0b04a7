//! Release flows for a multi-package repository
//!
//! # Flows
//!
//! - **prepare**: bump the shared minor version, build once, and cut one
//!   `release-<package>-v<x>-<y>-<z>` branch per package whose root holds
//!   only that package's built content
//! - **distribute**: push the release branches of the current version
//! - **status**: report versions, branches and interrupted-run leftovers
//!
//! Branch names come from [`naming`] in every flow; distribute finds what
//! prepare created only because both compute the same names.

pub mod distribute;
pub mod manifest;
pub mod naming;
pub mod packages;
pub mod prepare;
pub mod session;
pub mod status;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

pub use distribute::Distributor;
pub use prepare::{PrepareOptions, Preparer};
pub use status::ReleaseStatus;
