//! Service layer for workspace lifecycle and membership management.
//!
//! This is the request collaborator for workspace operations: it resolves
//! the acting user and target workspace, checks the relevant permission
//! predicate, and performs the mutation only when the predicate passes.
//! Permission failures are plain error values the caller can surface as a
//! user-visible message.

use crate::account::{
    domain::UserId,
    ports::{UserRepository, UserRepositoryError},
};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use crate::workspace::{
    domain::{Workspace, WorkspaceDomainError, WorkspaceId, WorkspaceName},
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceServiceError {
    /// The acting user is not the workspace owner.
    #[error("only the owner can manage workspace {0}")]
    NotOwner(WorkspaceId),

    /// The acting user is neither owner nor member of the workspace.
    #[error("user {user} has no access to workspace {workspace}")]
    AccessDenied {
        /// Target workspace.
        workspace: WorkspaceId,
        /// Acting user.
        user: UserId,
    },

    /// The workspace does not exist.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),

    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No user holds the given username.
    #[error("no user named '{0}'")]
    UnknownUsername(String),

    /// The user is already a member of the workspace.
    #[error("user {user} is already a member of workspace {workspace}")]
    AlreadyMember {
        /// Target workspace.
        workspace: WorkspaceId,
        /// Would-be member.
        user: UserId,
    },

    /// The owner cannot be added to the explicit member set.
    #[error("the owner is automatically a member of workspace {0}")]
    OwnerIsImplicitMember(WorkspaceId),

    /// The owner cannot be removed from the workspace.
    #[error("cannot remove the owner from workspace {0}")]
    CannotRemoveOwner(WorkspaceId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),

    /// Workspace persistence failed.
    #[error(transparent)]
    Repository(#[from] WorkspaceRepositoryError),

    /// User lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),

    /// Task cascade failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for workspace service operations.
pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

/// Workspace detail view for a specific viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceDetail {
    /// The workspace aggregate.
    pub workspace: Workspace,
    /// Whether the viewer owns the workspace.
    pub is_owner: bool,
    /// The explicit member set (owner excluded).
    pub members: BTreeSet<UserId>,
}

/// Workspace lifecycle and membership orchestration service.
#[derive(Clone)]
pub struct MembershipService<W, U, T, C>
where
    W: WorkspaceRepository,
    U: UserRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    workspaces: Arc<W>,
    users: Arc<U>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<W, U, T, C> MembershipService<W, U, T, C>
where
    W: WorkspaceRepository,
    U: UserRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(workspaces: Arc<W>, users: Arc<U>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            workspaces,
            users,
            tasks,
            clock,
        }
    }

    /// Creates a workspace owned by the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::UserNotFound`] when the owner does
    /// not exist, a domain error for an invalid name, or a repository
    /// error.
    pub async fn create_workspace(
        &self,
        owner: UserId,
        name: impl Into<String> + Send,
        description: impl Into<String> + Send,
    ) -> WorkspaceServiceResult<Workspace> {
        if self.users.find_by_id(owner).await?.is_none() {
            return Err(WorkspaceServiceError::UserNotFound(owner));
        }

        let workspace_name = WorkspaceName::new(name)?;
        let workspace = Workspace::new(workspace_name, description, owner, &*self.clock);
        self.workspaces.store(&workspace).await?;
        Ok(workspace)
    }

    /// Replaces the workspace name and description. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotOwner`] when the acting user
    /// does not own the workspace.
    pub async fn update_details(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
        name: impl Into<String> + Send,
        description: impl Into<String> + Send,
    ) -> WorkspaceServiceResult<Workspace> {
        let mut workspace = self.require_owned(acting, workspace_id).await?;
        let workspace_name = WorkspaceName::new(name)?;
        workspace.update_details(workspace_name, description, &*self.clock);
        self.workspaces.update(&workspace).await?;
        Ok(workspace)
    }

    /// Deletes a workspace and everything in it. Owner only.
    ///
    /// Tasks and their comments are removed first, then the workspace and
    /// its membership rows.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotOwner`] when the acting user
    /// does not own the workspace.
    pub async fn delete_workspace(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
    ) -> WorkspaceServiceResult<()> {
        let workspace = self.require_owned(acting, workspace_id).await?;
        self.tasks.delete_by_workspace(workspace.id()).await?;
        self.workspaces.delete(workspace.id()).await?;
        Ok(())
    }

    /// Adds the user holding `username` to the member set. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::UnknownUsername`] when no user
    /// holds the username, [`WorkspaceServiceError::AlreadyMember`] when
    /// the user is already in the set, and
    /// [`WorkspaceServiceError::OwnerIsImplicitMember`] when the username
    /// resolves to the owner.
    pub async fn add_member(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
        username: &str,
    ) -> WorkspaceServiceResult<Workspace> {
        let mut workspace = self.require_owned(acting, workspace_id).await?;

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| WorkspaceServiceError::UnknownUsername(username.to_owned()))?;

        if workspace.is_member(user.id()) {
            return Err(WorkspaceServiceError::AlreadyMember {
                workspace: workspace_id,
                user: user.id(),
            });
        }
        if workspace.is_owner(user.id()) {
            return Err(WorkspaceServiceError::OwnerIsImplicitMember(workspace_id));
        }

        workspace.add_member(user.id(), &*self.clock);
        self.workspaces.update(&workspace).await?;
        Ok(workspace)
    }

    /// Removes a member from the workspace. Owner only.
    ///
    /// Removing a user who is not a member is a no-op; removing the owner
    /// is refused before the domain mutation is reached.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::CannotRemoveOwner`] when the target
    /// is the workspace owner.
    pub async fn remove_member(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
        member: UserId,
    ) -> WorkspaceServiceResult<Workspace> {
        let mut workspace = self.require_owned(acting, workspace_id).await?;

        if workspace.is_owner(member) {
            return Err(WorkspaceServiceError::CannotRemoveOwner(workspace_id));
        }

        workspace.remove_member(member, &*self.clock);
        self.workspaces.update(&workspace).await?;
        Ok(workspace)
    }

    /// Returns the workspace detail view for the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::AccessDenied`] when the acting user
    /// is neither owner nor member.
    pub async fn workspace_detail(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
    ) -> WorkspaceServiceResult<WorkspaceDetail> {
        let workspace = self.require_workspace(workspace_id).await?;
        if !workspace.can_access(acting) {
            return Err(WorkspaceServiceError::AccessDenied {
                workspace: workspace_id,
                user: acting,
            });
        }

        let is_owner = workspace.is_owner(acting);
        let members = workspace.members().clone();
        Ok(WorkspaceDetail {
            workspace,
            is_owner,
            members,
        })
    }

    /// Returns the workspaces the acting user owns or belongs to, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::Repository`] when the listing
    /// fails.
    pub async fn list_for_user(&self, acting: UserId) -> WorkspaceServiceResult<Vec<Workspace>> {
        Ok(self.workspaces.list_for_user(acting).await?)
    }

    /// Loads a workspace or reports it missing.
    async fn require_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkspaceServiceResult<Workspace> {
        self.workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(WorkspaceServiceError::WorkspaceNotFound(workspace_id))
    }

    /// Loads a workspace and checks the acting user owns it.
    async fn require_owned(
        &self,
        acting: UserId,
        workspace_id: WorkspaceId,
    ) -> WorkspaceServiceResult<Workspace> {
        let workspace = self.require_workspace(workspace_id).await?;
        if !workspace.is_owner(acting) {
            return Err(WorkspaceServiceError::NotOwner(workspace_id));
        }
        Ok(workspace)
    }
}
