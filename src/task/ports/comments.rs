//! Repository port for comment persistence and lookup.

use crate::account::domain::UserId;
use crate::task::domain::{Comment, CommentId, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for comment repository operations.
pub type CommentRepositoryResult<T> = Result<T, CommentRepositoryError>;

/// Comment persistence contract.
///
/// Listings return comments oldest first, the reading order of a thread.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores a new comment.
    ///
    /// # Errors
    ///
    /// Returns [`CommentRepositoryError::DuplicateComment`] when the
    /// comment ID already exists.
    async fn store(&self, comment: &Comment) -> CommentRepositoryResult<()>;

    /// Persists changes to an existing comment (body, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`CommentRepositoryError::NotFound`] when the comment does
    /// not exist.
    async fn update(&self, comment: &Comment) -> CommentRepositoryResult<()>;

    /// Finds a comment by identifier.
    ///
    /// Returns `None` when the comment does not exist.
    async fn find_by_id(&self, id: CommentId) -> CommentRepositoryResult<Option<Comment>>;

    /// Deletes a comment.
    ///
    /// # Errors
    ///
    /// Returns [`CommentRepositoryError::NotFound`] when the comment does
    /// not exist.
    async fn delete(&self, id: CommentId) -> CommentRepositoryResult<()>;

    /// Returns the task's comments, oldest first.
    async fn list_by_task(&self, task_id: TaskId) -> CommentRepositoryResult<Vec<Comment>>;

    /// Deletes every comment authored by the user.
    ///
    /// Account-deletion hook; a no-op for users without comments.
    async fn delete_by_author(&self, user: UserId) -> CommentRepositoryResult<()>;
}

/// Errors returned by comment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CommentRepositoryError {
    /// A comment with the same identifier already exists.
    #[error("duplicate comment identifier: {0}")]
    DuplicateComment(CommentId),

    /// The comment was not found.
    #[error("comment not found: {0}")]
    NotFound(CommentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CommentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
