//! Domain model for workspaces and membership.

mod error;
mod ids;
mod workspace;

pub use error::WorkspaceDomainError;
pub use ids::{WorkspaceId, WorkspaceName};
pub use workspace::{PersistedWorkspaceData, Workspace};
