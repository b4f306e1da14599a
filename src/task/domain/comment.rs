//! Comment aggregate and author-scoped permission predicates.

use super::{CommentId, TaskDomainError, TaskId};
use crate::account::domain::UserId;
use crate::workspace::domain::Workspace;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated free-text comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentBody(String);

impl CommentBody {
    /// Creates a validated comment body.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyCommentBody`] when the value is
    /// empty or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(TaskDomainError::EmptyCommentBody);
        }
        Ok(Self(raw))
    }

    /// Returns the body as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommentBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comment aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    task_id: TaskId,
    author: UserId,
    body: CommentBody,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted comment identifier.
    pub id: CommentId,
    /// Persisted owning task identifier.
    pub task_id: TaskId,
    /// Persisted author identifier.
    pub author: UserId,
    /// Persisted body.
    pub body: CommentBody,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment on the given task.
    #[must_use]
    pub fn new(task_id: TaskId, author: UserId, body: CommentBody, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: CommentId::new(),
            task_id,
            author,
            body,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            author: data.author,
            body: data.body,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the owning task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author identifier.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment body.
    #[must_use]
    pub const fn body(&self) -> &CommentBody {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when the user may edit this comment. Author only;
    /// the workspace owner has no override here.
    #[must_use]
    pub fn can_edit(&self, user: UserId) -> bool {
        self.author == user
    }

    /// Returns `true` when the user may delete this comment: the author or
    /// the owner of the workspace the comment's task belongs to.
    #[must_use]
    pub fn can_delete(&self, workspace: &Workspace, user: UserId) -> bool {
        self.author == user || workspace.is_owner(user)
    }

    /// Returns `true` when the comment was edited after creation.
    ///
    /// A one-second tolerance absorbs the write path's own timestamping
    /// jitter so freshly created comments are not flagged.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at + Duration::seconds(1)
    }

    /// Replaces the body and touches the update timestamp.
    ///
    /// Callers gate this on [`Comment::can_edit`].
    pub fn edit_body(&mut self, body: CommentBody, clock: &impl Clock) {
        self.body = body;
        self.updated_at = clock.utc();
    }
}
