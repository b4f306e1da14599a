//! Service layer for registration, profile updates, and account removal.
//!
//! Account deletion orchestrates the cross-aggregate cascade: owned
//! workspaces go first (with their tasks and comments), then tasks the
//! user created, then assignee references, authored comments, and
//! membership rows, and finally the user row itself.

use crate::account::{
    domain::{AccountDomainError, EmailAddress, ProfileUpdate, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError},
};
use crate::task::{
    domain::TaskStatus,
    ports::{CommentRepository, CommentRepositoryError, TaskRepository, TaskRepositoryError},
};
use crate::workspace::ports::{WorkspaceRepository, WorkspaceRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    username: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
}

impl NewAccount {
    /// Creates a registration request with the required fields.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
        }
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }
}

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountServiceError {
    /// The user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AccountDomainError),

    /// User persistence failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),

    /// Workspace cascade failed.
    #[error(transparent)]
    Workspaces(#[from] WorkspaceRepositoryError),

    /// Task cascade failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Comment cascade failed.
    #[error(transparent)]
    Comments(#[from] CommentRepositoryError),
}

/// Result type for account service operations.
pub type AccountServiceResult<T> = Result<T, AccountServiceError>;

/// Profile view with the user's activity statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    /// The user aggregate.
    pub user: User,
    /// Workspaces the user owns.
    pub owned_workspaces: usize,
    /// Workspaces the user belongs to as an explicit member.
    pub member_workspaces: usize,
    /// Tasks the user created.
    pub created_tasks: usize,
    /// Tasks assigned to the user.
    pub assigned_tasks: usize,
    /// Tasks the user created or holds that are done.
    pub completed_tasks: usize,
}

/// Account orchestration service.
#[derive(Clone)]
pub struct ProfileService<U, W, T, Cm, C>
where
    U: UserRepository,
    W: WorkspaceRepository,
    T: TaskRepository,
    Cm: CommentRepository,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    workspaces: Arc<W>,
    tasks: Arc<T>,
    comments: Arc<Cm>,
    clock: Arc<C>,
}

impl<U, W, T, Cm, C> ProfileService<U, W, T, Cm, C>
where
    U: UserRepository,
    W: WorkspaceRepository,
    T: TaskRepository,
    Cm: CommentRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new profile service.
    #[must_use]
    pub const fn new(
        users: Arc<U>,
        workspaces: Arc<W>,
        tasks: Arc<T>,
        comments: Arc<Cm>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            users,
            workspaces,
            tasks,
            comments,
            clock,
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns a domain error for an invalid username or email, or a
    /// repository error when either is already taken.
    pub async fn register(&self, account: NewAccount) -> AccountServiceResult<User> {
        let username = Username::new(account.username)?;
        let email = EmailAddress::new(account.email)?;

        let mut user = User::new(username, email, &*self.clock);
        if account.first_name.is_some() || account.last_name.is_some() {
            let mut update = ProfileUpdate::new();
            if let Some(first_name) = account.first_name {
                update = update.with_first_name(first_name);
            }
            if let Some(last_name) = account.last_name {
                update = update.with_last_name(last_name);
            }
            user.apply_profile_update(update, &*self.clock)?;
        }

        self.users.store(&user).await?;
        Ok(user)
    }

    /// Replaces the acting user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] when the user does
    /// not exist, or a domain error for an over-long bio.
    pub async fn update_profile(
        &self,
        acting: UserId,
        update: ProfileUpdate,
    ) -> AccountServiceResult<User> {
        let mut user = self.require_user(acting).await?;
        user.apply_profile_update(update, &*self.clock)?;
        self.users.update(&user).await?;
        Ok(user)
    }

    /// Returns the acting user's profile with activity statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] when the user does
    /// not exist.
    pub async fn profile(&self, acting: UserId) -> AccountServiceResult<ProfileSummary> {
        let user = self.require_user(acting).await?;

        let owned_workspaces = self.workspaces.list_owned_by(acting).await?.len();
        let all_workspaces = self.workspaces.list_for_user(acting).await?.len();
        let my_tasks = self.tasks.list_for_user(acting).await?;

        let created_tasks = my_tasks
            .iter()
            .filter(|task| task.created_by() == acting)
            .count();
        let assigned_tasks = my_tasks
            .iter()
            .filter(|task| task.assignee() == Some(acting))
            .count();
        let completed_tasks = my_tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::Done)
            .count();

        Ok(ProfileSummary {
            user,
            owned_workspaces,
            member_workspaces: all_workspaces - owned_workspaces,
            created_tasks,
            assigned_tasks,
            completed_tasks,
        })
    }

    /// Deletes the acting user's account and everything it anchors.
    ///
    /// # Errors
    ///
    /// Returns [`AccountServiceError::UserNotFound`] when the user does
    /// not exist; cascade failures surface as repository errors.
    pub async fn delete_account(&self, acting: UserId) -> AccountServiceResult<()> {
        let user = self.require_user(acting).await?;

        for workspace in self.workspaces.list_owned_by(user.id()).await? {
            self.tasks.delete_by_workspace(workspace.id()).await?;
            self.workspaces.delete(workspace.id()).await?;
        }
        self.tasks.delete_created_by(user.id()).await?;
        self.tasks.clear_assignee(user.id()).await?;
        self.comments.delete_by_author(user.id()).await?;
        self.workspaces.remove_user_memberships(user.id()).await?;
        self.users.delete(user.id()).await?;
        Ok(())
    }

    /// Loads a user or reports it missing.
    async fn require_user(&self, id: UserId) -> AccountServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AccountServiceError::UserNotFound(id))
    }
}
