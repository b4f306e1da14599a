//! Service layer for comment creation, editing, and deletion.
//!
//! Comment permissions are deliberately asymmetric: editing is
//! author-only, deletion is author-or-workspace-owner. Both rules live on
//! the aggregate; this service resolves the entities and gates the
//! mutations.

use crate::account::domain::UserId;
use crate::task::{
    domain::{Comment, CommentBody, CommentId, TaskDomainError, TaskId},
    ports::{
        CommentRepository, CommentRepositoryError, TaskRepository, TaskRepositoryError,
    },
};
use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::{WorkspaceRepository, WorkspaceRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for comment operations.
#[derive(Debug, Error)]
pub enum CommentServiceError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The comment does not exist.
    #[error("comment not found: {0}")]
    CommentNotFound(CommentId),

    /// The workspace behind the task does not exist.
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(WorkspaceId),

    /// The acting user is neither owner nor member of the workspace.
    #[error("user {user} has no access to workspace {workspace}")]
    AccessDenied {
        /// Target workspace.
        workspace: WorkspaceId,
        /// Acting user.
        user: UserId,
    },

    /// Only the author may edit a comment.
    #[error("user {user} is not the author of comment {comment}")]
    NotAuthor {
        /// Target comment.
        comment: CommentId,
        /// Acting user.
        user: UserId,
    },

    /// The acting user may not delete the comment.
    #[error("user {user} may not delete comment {comment}")]
    DeleteForbidden {
        /// Target comment.
        comment: CommentId,
        /// Acting user.
        user: UserId,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Comment persistence failed.
    #[error(transparent)]
    Repository(#[from] CommentRepositoryError),

    /// Task lookup failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// Workspace lookup failed.
    #[error(transparent)]
    Workspaces(#[from] WorkspaceRepositoryError),
}

/// Result type for comment service operations.
pub type CommentServiceResult<T> = Result<T, CommentServiceError>;

/// Comment orchestration service.
#[derive(Clone)]
pub struct CommentService<Cm, T, W, C>
where
    Cm: CommentRepository,
    T: TaskRepository,
    W: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    comments: Arc<Cm>,
    tasks: Arc<T>,
    workspaces: Arc<W>,
    clock: Arc<C>,
}

impl<Cm, T, W, C> CommentService<Cm, T, W, C>
where
    Cm: CommentRepository,
    T: TaskRepository,
    W: WorkspaceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new comment service.
    #[must_use]
    pub const fn new(comments: Arc<Cm>, tasks: Arc<T>, workspaces: Arc<W>, clock: Arc<C>) -> Self {
        Self {
            comments,
            tasks,
            workspaces,
            clock,
        }
    }

    /// Adds a comment to a task. Any participant of the task's workspace
    /// may comment.
    ///
    /// # Errors
    ///
    /// Returns [`CommentServiceError::AccessDenied`] when the acting user
    /// is not a participant, or a domain error for an empty body.
    pub async fn add_comment(
        &self,
        acting: UserId,
        task_id: TaskId,
        body: impl Into<String> + Send,
    ) -> CommentServiceResult<Comment> {
        let workspace = self.require_task_workspace(task_id).await?;
        if !workspace.can_access(acting) {
            return Err(CommentServiceError::AccessDenied {
                workspace: workspace.id(),
                user: acting,
            });
        }

        let comment_body = CommentBody::new(body)?;
        let comment = Comment::new(task_id, acting, comment_body, &*self.clock);
        self.comments.store(&comment).await?;
        Ok(comment)
    }

    /// Replaces a comment's body. Author only; the workspace owner has no
    /// override on edits.
    ///
    /// # Errors
    ///
    /// Returns [`CommentServiceError::NotAuthor`] when the acting user did
    /// not write the comment.
    pub async fn edit_comment(
        &self,
        acting: UserId,
        comment_id: CommentId,
        body: impl Into<String> + Send,
    ) -> CommentServiceResult<Comment> {
        let mut comment = self.require_comment(comment_id).await?;
        if !comment.can_edit(acting) {
            return Err(CommentServiceError::NotAuthor {
                comment: comment_id,
                user: acting,
            });
        }

        let comment_body = CommentBody::new(body)?;
        comment.edit_body(comment_body, &*self.clock);
        self.comments.update(&comment).await?;
        Ok(comment)
    }

    /// Deletes a comment. Allowed for the author or the owner of the
    /// workspace the comment's task belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`CommentServiceError::DeleteForbidden`] when the acting
    /// user is neither author nor workspace owner.
    pub async fn delete_comment(
        &self,
        acting: UserId,
        comment_id: CommentId,
    ) -> CommentServiceResult<()> {
        let comment = self.require_comment(comment_id).await?;
        let workspace = self.require_task_workspace(comment.task_id()).await?;
        if !comment.can_delete(&workspace, acting) {
            return Err(CommentServiceError::DeleteForbidden {
                comment: comment_id,
                user: acting,
            });
        }

        self.comments.delete(comment_id).await?;
        Ok(())
    }

    /// Loads a comment or reports it missing.
    async fn require_comment(&self, comment_id: CommentId) -> CommentServiceResult<Comment> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or(CommentServiceError::CommentNotFound(comment_id))
    }

    /// Loads the workspace a task belongs to.
    async fn require_task_workspace(&self, task_id: TaskId) -> CommentServiceResult<Workspace> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(CommentServiceError::TaskNotFound(task_id))?;
        self.workspaces
            .find_by_id(task.workspace_id())
            .await?
            .ok_or(CommentServiceError::WorkspaceNotFound(task.workspace_id()))
    }
}
