//! Repository port for workspace persistence and membership storage.

use crate::account::domain::UserId;
use crate::workspace::domain::{Workspace, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workspace repository operations.
pub type WorkspaceRepositoryResult<T> = Result<T, WorkspaceRepositoryError>;

/// Workspace persistence contract.
///
/// The explicit member set is persisted as part of the aggregate: `update`
/// replaces the stored set with the aggregate's current one.
#[async_trait]
pub trait WorkspaceRepository: Send + Sync {
    /// Stores a new workspace.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::DuplicateWorkspace`] when the
    /// workspace ID already exists.
    async fn store(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()>;

    /// Persists changes to an existing workspace (details, member set,
    /// timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::NotFound`] when the workspace
    /// does not exist.
    async fn update(&self, workspace: &Workspace) -> WorkspaceRepositoryResult<()>;

    /// Finds a workspace by identifier.
    ///
    /// Returns `None` when the workspace does not exist.
    async fn find_by_id(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<Option<Workspace>>;

    /// Deletes a workspace and its membership rows.
    ///
    /// Task cleanup is a separate storage operation orchestrated by the
    /// membership service (tasks live in their own bounded context).
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceRepositoryError::NotFound`] when the workspace
    /// does not exist.
    async fn delete(&self, id: WorkspaceId) -> WorkspaceRepositoryResult<()>;

    /// Returns all workspaces owned by the user, newest first.
    async fn list_owned_by(&self, user: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>>;

    /// Returns all workspaces the user owns or is a member of, newest
    /// first.
    async fn list_for_user(&self, user: UserId) -> WorkspaceRepositoryResult<Vec<Workspace>>;

    /// Removes the user from the explicit member set of every workspace.
    ///
    /// Used by account deletion; a no-op for users with no memberships.
    async fn remove_user_memberships(&self, user: UserId) -> WorkspaceRepositoryResult<()>;
}

/// Errors returned by workspace repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceRepositoryError {
    /// A workspace with the same identifier already exists.
    #[error("duplicate workspace identifier: {0}")]
    DuplicateWorkspace(WorkspaceId),

    /// The workspace was not found.
    #[error("workspace not found: {0}")]
    NotFound(WorkspaceId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkspaceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
