//! Repository port for task persistence, filtering, and cascade cleanup.

use crate::account::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskPriority, TaskStatus};
use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Assignee criterion for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeFilter {
    /// Only tasks with no assignee.
    Unassigned,
    /// Only tasks assigned to the given user.
    User(UserId),
}

/// Filter criteria for workspace task listings.
///
/// `None` fields mean "no constraint"; criteria combine conjunctively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
    /// Restrict to one priority.
    pub priority: Option<TaskPriority>,
    /// Restrict by assignee.
    pub assignee: Option<AssigneeFilter>,
}

impl TaskFilter {
    /// Creates an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the listing to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts the listing by assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Returns `true` when the task satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = self.status.is_none_or(|status| task.status() == status);
        let priority_ok = self
            .priority
            .is_none_or(|priority| task.priority() == priority);
        let assignee_ok = self.assignee.is_none_or(|assignee| match assignee {
            AssigneeFilter::Unassigned => task.assignee().is_none(),
            AssigneeFilter::User(user) => task.assignee() == Some(user),
        });
        status_ok && priority_ok && assignee_ok
    }
}

/// Per-status task counts for one workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStatusCounts {
    /// Tasks in the to-do status.
    pub todo: usize,
    /// Tasks in progress.
    pub in_progress: usize,
    /// Completed tasks.
    pub done: usize,
}

impl TaskStatusCounts {
    /// Returns the total across all statuses.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }

    /// Adds one task's status to the counts.
    pub const fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Todo => self.todo += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Done => self.done += 1,
        }
    }
}

/// Task persistence contract.
///
/// Listings return tasks newest first. Deletions cascade to the task's
/// comments inside the storage boundary.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Deletes a task and its comments.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Deletes every task in the workspace along with their comments.
    ///
    /// A no-op for workspaces without tasks.
    async fn delete_by_workspace(&self, workspace_id: WorkspaceId) -> TaskRepositoryResult<()>;

    /// Deletes every task created by the user along with their comments.
    ///
    /// Account-deletion hook; a no-op for users without created tasks.
    async fn delete_created_by(&self, user: UserId) -> TaskRepositoryResult<()>;

    /// Clears the assignee on every task assigned to the user.
    ///
    /// Account-deletion hook; the tasks themselves survive.
    async fn clear_assignee(&self, user: UserId) -> TaskRepositoryResult<()>;

    /// Returns the workspace's tasks matching the filter, newest first.
    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
        filter: &TaskFilter,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns all tasks the user created or is assigned to, newest first.
    async fn list_for_user(&self, user: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns per-status counts for the workspace's tasks.
    async fn status_counts(
        &self,
        workspace_id: WorkspaceId,
    ) -> TaskRepositoryResult<TaskStatusCounts>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
