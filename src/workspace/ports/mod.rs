//! Port contracts for workspace persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by workspace
//! services.

pub mod repository;

pub use repository::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult};
